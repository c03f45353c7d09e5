//! The HTML document skeleton that wraps a rendered fragment.
//!
//! The skeleton is constant; only the title, the stylesheet and the body
//! fragment are substituted.

use crate::pipeline::render::escape_html;

/// Stylesheet used when no custom CSS is configured.
pub const DEFAULT_STYLESHEET: &str = r#"        body {
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: #333;
        }
        pre {
            background: #f6f8fa;
            padding: 16px;
            border-radius: 6px;
            overflow-x: auto;
        }
        code {
            font-family: Consolas, Monaco, "Andale Mono", monospace;
            font-size: 0.9em;
            background: #f6f8fa;
            padding: 2px 4px;
            border-radius: 3px;
        }
        blockquote {
            border-left: 4px solid #ddd;
            margin: 0;
            padding-left: 16px;
            color: #666;
        }
        img {
            max-width: 100%;
            height: auto;
        }
        hr {
            border: none;
            border-top: 1px solid #ddd;
            margin: 24px 0;
        }"#;

/// `<title>` text for a document converted from `filename`.
pub fn document_title(filename: &str) -> String {
    format!("{filename} - Converted HTML")
}

/// Embed `fragment` in a complete HTML document.
///
/// `stylesheet` replaces [`DEFAULT_STYLESHEET`] when given. With `escape`
/// set the title is escaped too; the fragment is inserted as-is either way.
pub fn wrap_document(
    filename: &str,
    fragment: &str,
    stylesheet: Option<&str>,
    escape: bool,
) -> String {
    let title = document_title(filename);
    let title = if escape { escape_html(&title) } else { title };
    let css = stylesheet.unwrap_or(DEFAULT_STYLESHEET);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
{fragment}
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_parts() {
        let doc = wrap_document("notes.md", "<p>hi</p>", None, false);
        assert!(doc.starts_with("<!DOCTYPE html>\n"));
        assert!(doc.contains(r#"<meta charset="UTF-8">"#));
        assert!(doc.contains(r#"<meta name="viewport""#));
        assert!(doc.contains("<title>notes.md - Converted HTML</title>"));
        assert!(doc.contains("<body>\n<p>hi</p>\n</body>"));
        assert!(doc.ends_with("</html>"));
    }

    #[test]
    fn default_stylesheet_covers_code_and_quotes() {
        let doc = wrap_document("a.md", "", None, false);
        assert!(doc.contains("max-width: 800px"));
        assert!(doc.contains("monospace"));
        assert!(doc.contains("border-left: 4px solid #ddd"));
    }

    #[test]
    fn custom_stylesheet_replaces_default() {
        let doc = wrap_document("a.md", "", Some("p { color: red; }"), false);
        assert!(doc.contains("p { color: red; }"));
        assert!(!doc.contains("max-width: 800px"));
    }

    #[test]
    fn title_escaping_follows_flag() {
        let raw = wrap_document("<b>.md", "", None, false);
        assert!(raw.contains("<title><b>.md - Converted HTML</title>"));
        let escaped = wrap_document("<b>.md", "", None, true);
        assert!(escaped.contains("<title>&lt;b&gt;.md - Converted HTML</title>"));
    }
}
