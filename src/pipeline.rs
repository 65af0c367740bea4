use anyhow::{Context, Result};
use log::{error, info};
use std::path::{Path, PathBuf};
use tempfile::Builder;

use crate::encode::{AudioFormat, Transcoder};
use crate::epub_reader::BookOpener;
use crate::filename::FilenameTemplate;
use crate::metadata::BookIdentity;
use crate::synth::Synthesizer;
use crate::text::{self, MIN_CHAPTER_LEN};

/// Run-wide output configuration, shared by every chapter of every book.
pub struct OutputSpec {
    pub format: AudioFormat,
    pub template: FilenameTemplate,
    pub dir: PathBuf,
}

/// An accepted, normalized text unit destined for one audio file.
pub struct Chapter {
    /// 1-based position among accepted documents; skipped documents do
    /// not consume an index.
    pub index: u32,
    pub text: String,
}

/// Processes every input file in order. A book that cannot be opened is
/// reported and skipped; the run always continues with the remaining
/// inputs. Returns true only when every document and chapter succeeded.
pub fn process_books(
    files: &[PathBuf],
    spec: &OutputSpec,
    author_override: Option<&str>,
    title_override: Option<&str>,
    opener: &dyn BookOpener,
    synth: &dyn Synthesizer,
    transcoder: &dyn Transcoder,
) -> bool {
    let mut clean = true;

    for file in files {
        info!("Starting processing for: {}", file.display());
        match process_book(
            file,
            spec,
            author_override,
            title_override,
            opener,
            synth,
            transcoder,
        ) {
            Ok(0) => {}
            Ok(_) => clean = false,
            Err(err) => {
                error!("{:#}", err);
                clean = false;
            }
        }
    }

    clean
}

/// Converts one book into per-chapter audio files.
///
/// A chapter that fails to synthesize or encode is reported and skipped;
/// the rest of the book still processes. Returns the number of failed
/// chapters, or an error when the book itself cannot be opened.
pub fn process_book(
    path: &Path,
    spec: &OutputSpec,
    author_override: Option<&str>,
    title_override: Option<&str>,
    opener: &dyn BookOpener,
    synth: &dyn Synthesizer,
    transcoder: &dyn Transcoder,
) -> Result<usize> {
    let book = opener.open(path)?;
    let identity = BookIdentity::resolve(&book, author_override, title_override);
    info!("Identified Author: {}", identity.author);
    info!("Identified Title: {}", identity.title);

    let chapters = collect_chapters(&book.documents);
    Ok(run_chapters(&chapters, &identity, spec, synth, transcoder))
}

/// Normalizes raw spine documents and assigns sequential chapter indices
/// to those long enough to be worth reading aloud.
fn collect_chapters(documents: &[String]) -> Vec<Chapter> {
    let mut chapters = Vec::new();
    let mut index = 1;

    for html in documents {
        let text = text::normalize(html);
        if text.chars().count() < MIN_CHAPTER_LEN {
            continue;
        }
        chapters.push(Chapter { index, text });
        index += 1;
    }

    chapters
}

/// Produces audio for each chapter in index order, isolating failures so
/// one bad chapter never aborts the rest of the book. Returns the number
/// of chapters that failed.
fn run_chapters(
    chapters: &[Chapter],
    identity: &BookIdentity,
    spec: &OutputSpec,
    synth: &dyn Synthesizer,
    transcoder: &dyn Transcoder,
) -> usize {
    let mut failed = 0;

    for chapter in chapters {
        if let Err(err) = produce_chapter(chapter, identity, spec, synth, transcoder) {
            error!(
                "TTS or conversion failed for chapter {}: {:#}",
                chapter.index, err
            );
            failed += 1;
        }
    }

    failed
}

fn produce_chapter(
    chapter: &Chapter,
    identity: &BookIdentity,
    spec: &OutputSpec,
    synth: &dyn Synthesizer,
    transcoder: &dyn Transcoder,
) -> Result<()> {
    info!("Processing Chapter {}...", chapter.index);

    let filename = spec
        .template
        .render(chapter.index, identity, spec.format.extension());
    let destination = spec.dir.join(filename);

    // The temp file deletes itself on drop, so the raw synthesis output is
    // cleaned up on every exit path, including the failures below.
    let temp = Builder::new()
        .prefix("epub2audio-")
        .suffix(synth.native_extension())
        .tempfile()
        .context("Failed to create temporary synthesis file")?;

    synth.synthesize(&chapter.text, temp.path())?;
    transcoder.transcode(temp.path(), &destination, spec.format)?;

    Ok(())
}
