//! Source normalisation before classification and fragment assembly after
//! rendering.
//!
//! Both passes are pure string functions with no shared state. Blank lines
//! never reach the assembled fragment: blank blocks render to nothing, so a
//! run of any number of blank source lines leaves exactly one newline
//! between the elements around it. Code blocks keep their own blank lines
//! because those live inside a single rendered element.

use std::borrow::Cow;

/// Normalise line endings (CRLF and lone CR → LF).
pub fn normalise_source(input: &str) -> Cow<'_, str> {
    if input.contains('\r') {
        Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Join rendered elements one per line and trim the result.
///
/// List items are already emitted contiguously by the renderer, one
/// `<li>` per line with no blank line between them.
pub fn assemble_fragment<I>(parts: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut fragment = String::new();
    for part in parts {
        if !fragment.is_empty() {
            fragment.push('\n');
        }
        fragment.push_str(&part);
    }
    fragment.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_source("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_normalise_borrows_when_clean() {
        assert!(matches!(normalise_source("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_assemble_one_per_line() {
        let parts = vec!["<h1>T</h1>".to_string(), "<p>x</p>".to_string()];
        assert_eq!(assemble_fragment(parts), "<h1>T</h1>\n<p>x</p>");
    }

    #[test]
    fn test_assemble_empty() {
        assert_eq!(assemble_fragment(Vec::<String>::new()), "");
    }

    #[test]
    fn test_assemble_trims_outer_whitespace() {
        let parts = vec!["  <p>x</p>".to_string(), "<hr>\n".to_string()];
        assert_eq!(assemble_fragment(parts), "<p>x</p>\n<hr>");
    }
}
