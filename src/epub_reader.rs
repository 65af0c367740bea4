use anyhow::{bail, Context, Result};
use rbook::prelude::*;
use rbook::Epub;
use std::path::Path;

/// The pieces of an opened book the pipeline consumes: naming metadata
/// plus raw markup for every content document, in spine order.
pub struct Book {
    pub title: Option<String>,
    pub author: Option<String>,
    pub documents: Vec<String>,
}

/// Opens e-book containers. A trait so whole runs can be driven by fakes
/// in tests, like the synthesis and transcoding seams.
pub trait BookOpener {
    fn open(&self, path: &Path) -> Result<Book>;
}

/// Opens EPUB containers with rbook.
pub struct EpubOpener;

impl BookOpener for EpubOpener {
    fn open(&self, path: &Path) -> Result<Book> {
        if !path.exists() {
            bail!("File not found: {}", path.display());
        }

        let epub = Epub::options()
            .strict(false)
            .open(path)
            .with_context(|| format!("Could not read EPUB: {}", path.display()))?;

        let title = epub.metadata().title().map(|t| t.value().to_string());
        // First listed creator wins, matching the naming precedence rules.
        let author = epub
            .metadata()
            .creators()
            .next()
            .map(|c| c.value().to_string());

        // Non-document resources (images, stylesheets, fonts) never appear
        // in the spine reader, so every entry is a chapter candidate.
        let mut documents = Vec::new();
        let mut reader = epub.reader();
        while let Some(result) = reader.read_next() {
            let data = result.context("Failed to read chapter content")?;
            documents.push(data.content().to_string());
        }

        Ok(Book {
            title,
            author,
            documents,
        })
    }
}
