use crate::epub_reader::Book;

/// Characters that are invalid in filenames on common filesystems.
const UNSAFE_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Resolved author/title pair for one book.
///
/// The plain values are for display and logging; `safe_author` and
/// `safe_title` have filesystem-unsafe characters removed and are the
/// only forms that may appear in filenames.
pub struct BookIdentity {
    pub author: String,
    pub title: String,
    pub safe_author: String,
    pub safe_title: String,
}

impl BookIdentity {
    pub fn new(author: String, title: String) -> Self {
        let safe_author = sanitize(&author);
        let safe_title = sanitize(&title);
        Self {
            author,
            title,
            safe_author,
            safe_title,
        }
    }

    /// Command-line overrides win over document metadata, which wins over
    /// the literal fallbacks.
    pub fn resolve(
        book: &Book,
        author_override: Option<&str>,
        title_override: Option<&str>,
    ) -> Self {
        Self::new(
            pick(author_override, book.author.clone(), "Unknown Author"),
            pick(title_override, book.title.clone(), "Unknown Title"),
        )
    }
}

fn pick(override_value: Option<&str>, metadata_value: Option<String>, fallback: &str) -> String {
    override_value
        .map(str::to_string)
        .filter(|v| !v.is_empty())
        .or_else(|| metadata_value.filter(|v| !v.is_empty()))
        .unwrap_or_else(|| fallback.to_string())
}

fn sanitize(value: &str) -> String {
    value.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect()
}
