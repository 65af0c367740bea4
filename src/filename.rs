use anyhow::{bail, Result};

use crate::metadata::BookIdentity;

/// A parsed output-filename template.
///
/// Parsing splits the template around its single printf-style chapter
/// directive up front, so a bad template is rejected once at startup
/// instead of producing colliding filenames for every chapter of the run.
pub struct FilenameTemplate {
    before: String,
    after: String,
    pad_width: usize,
    zero_pad: bool,
}

impl FilenameTemplate {
    /// Validates the template. It must contain exactly one integer
    /// directive (`%d`, `%4d`, `%02d`); `%%` escapes a literal percent.
    pub fn parse(template: &str) -> Result<Self> {
        let mut before = String::new();
        let mut after = String::new();
        let mut directive: Option<(usize, bool)> = None;

        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            let out = if directive.is_none() {
                &mut before
            } else {
                &mut after
            };

            if c != '%' {
                out.push(c);
                continue;
            }

            if chars.peek() == Some(&'%') {
                chars.next();
                out.push('%');
                continue;
            }

            let mut width = String::new();
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                width.push(d);
                chars.next();
            }
            if chars.next() != Some('d') {
                bail!(
                    "filename template '{}' has a stray '%'; use %d or %02d for the chapter number",
                    template
                );
            }
            if directive.is_some() {
                bail!(
                    "filename template '{}' has more than one chapter number directive",
                    template
                );
            }
            directive = Some((width.parse().unwrap_or(0), width.starts_with('0')));
        }

        let Some((pad_width, zero_pad)) = directive else {
            bail!(
                "filename template '{}' is missing a chapter number directive such as %02d",
                template
            );
        };

        Ok(Self {
            before,
            after,
            pad_width,
            zero_pad,
        })
    }

    /// Renders the final filename for one chapter: chapter index into the
    /// numeric directive, sanitized identity into `${Author}`/`${Title}`,
    /// then the extension either substituted for `${ext}` (dot stripped)
    /// or appended whole.
    pub fn render(&self, chapter: u32, identity: &BookIdentity, extension: &str) -> String {
        let index = if self.zero_pad {
            format!("{:0width$}", chapter, width = self.pad_width)
        } else {
            format!("{:width$}", chapter, width = self.pad_width)
        };

        let rendered = format!("{}{}{}", self.before, index, self.after)
            .replace("${Author}", &identity.safe_author)
            .replace("${Title}", &identity.safe_title);

        if rendered.contains("${ext}") {
            rendered.replace("${ext}", extension.trim_start_matches('.'))
        } else {
            rendered + extension
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(author: &str, title: &str) -> BookIdentity {
        BookIdentity::new(author.to_string(), title.to_string())
    }

    #[test]
    fn renders_default_style_template() {
        let template = FilenameTemplate::parse("${Author}-${Title} - Chapter %02d.${ext}").unwrap();
        let name = template.render(3, &identity("Jane Doe", "Dune"), ".mp3");
        assert_eq!(name, "Jane Doe-Dune - Chapter 03.mp3");
    }

    #[test]
    fn appends_extension_when_no_ext_token() {
        let template = FilenameTemplate::parse("Ch%d").unwrap();
        let name = template.render(7, &identity("A", "B"), ".wav");
        assert_eq!(name, "Ch7.wav");
    }

    #[test]
    fn substitutes_sanitized_identity() {
        let template = FilenameTemplate::parse("${Author} %d").unwrap();
        let name = template.render(1, &identity("A/B", "ignored"), ".m4a");
        assert_eq!(name, "AB 1.m4a");
    }

    #[test]
    fn zero_padding_follows_directive_width() {
        let template = FilenameTemplate::parse("c%04d").unwrap();
        assert_eq!(template.render(12, &identity("a", "t"), ".wav"), "c0012.wav");
    }

    #[test]
    fn escaped_percent_is_literal() {
        let template = FilenameTemplate::parse("100%% done %d").unwrap();
        assert_eq!(
            template.render(2, &identity("a", "t"), ".mp3"),
            "100% done 2.mp3"
        );
    }

    #[test]
    fn rejects_template_without_directive() {
        assert!(FilenameTemplate::parse("${Author}-${Title}.${ext}").is_err());
    }

    #[test]
    fn rejects_multiple_directives() {
        assert!(FilenameTemplate::parse("%d-%d").is_err());
    }

    #[test]
    fn rejects_stray_percent() {
        assert!(FilenameTemplate::parse("Chapter %s").is_err());
    }
}
