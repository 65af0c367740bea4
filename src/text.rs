use html2text::from_read;

/// Minimum normalized length (in characters) for a content document to
/// count as a chapter. Filters cover pages, copyright stubs and other
/// boilerplate fragments.
pub const MIN_CHAPTER_LEN: usize = 100;

/// Strips markup from a content document, returning plain text with
/// whitespace runs collapsed to single spaces.
///
/// Script and style content is dropped by the extractor, and malformed
/// markup degrades to a partial extraction rather than an error.
pub fn normalize(html: &str) -> String {
    let text = from_read(html.as_bytes(), 80);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
