//! Inline span rendering: code spans, images, links, strong and emphasis.
//!
//! All spans are matched by one alternation regex in a single left-to-right
//! pass. At any position the alternatives are tried in order, which gives
//! the precedence the renderer relies on:
//!
//! - a code span claims its content before anything inside it can match,
//!   and that content is emitted verbatim;
//! - `![alt](src)` is tried before `[text](href)`, since an image is a link
//!   with a `!` prefix;
//! - `**strong**` is tried before `*emphasis*`, and emphasis content steps
//!   over whole `**…**` runs, so a strong run is never half-consumed as
//!   emphasis even when the emphasis opens first.
//!
//! Link text and strong/emphasis content are rendered recursively, so spans
//! may nest (`**[a](b)**`, `[*a*](b)`).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::pipeline::render::escape_html;

static RE_INLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"`(?P<code>[^`]+)`",
        r"|!\[(?P<alt>[^\]]+)\]\((?P<src>[^)]+)\)",
        r"|\[(?P<text>[^\]]+)\]\((?P<href>[^)]+)\)",
        r"|\*\*(?P<strong>.+?)\*\*",
        r"|\*(?P<em>(?:\*\*[^*]+\*\*|[^*])+)\*",
        r"|_(?P<em_u>[^_]+)_",
    ))
    .unwrap()
});

/// Render the inline spans of one line of block text.
///
/// With `escape` set, HTML-significant characters are escaped before the
/// spans are matched; the Markdown delimiters are unaffected by escaping.
pub fn render_inline(text: &str, escape: bool) -> String {
    if escape {
        apply_spans(&escape_html(text))
    } else {
        apply_spans(text)
    }
}

fn apply_spans(text: &str) -> String {
    RE_INLINE
        .replace_all(text, |caps: &Captures<'_>| render_span(caps))
        .into_owned()
}

fn render_span(caps: &Captures<'_>) -> String {
    if let Some(code) = caps.name("code") {
        return format!("<code>{}</code>", code.as_str());
    }
    if let (Some(alt), Some(src)) = (caps.name("alt"), caps.name("src")) {
        return format!(r#"<img src="{}" alt="{}">"#, src.as_str(), alt.as_str());
    }
    if let (Some(text), Some(href)) = (caps.name("text"), caps.name("href")) {
        return format!(
            r#"<a href="{}">{}</a>"#,
            href.as_str(),
            apply_spans(text.as_str())
        );
    }
    if let Some(inner) = caps.name("strong") {
        return format!("<strong>{}</strong>", apply_spans(inner.as_str()));
    }
    if let Some(inner) = caps.name("em").or_else(|| caps.name("em_u")) {
        return format!("<em>{}</em>", apply_spans(inner.as_str()));
    }
    caps[0].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> String {
        render_inline(text, false)
    }

    #[test]
    fn text_without_spans_is_unchanged() {
        assert_eq!(plain("just words, 3 + 4 = 7."), "just words, 3 + 4 = 7.");
    }

    #[test]
    fn strong_before_emphasis() {
        assert_eq!(plain("**bold**"), "<strong>bold</strong>");
        assert_eq!(plain("*soft*"), "<em>soft</em>");
        assert_eq!(plain("_soft_"), "<em>soft</em>");
        assert_eq!(
            plain("**bold** and *soft*"),
            "<strong>bold</strong> and <em>soft</em>"
        );
    }

    #[test]
    fn emphasis_nests_inside_strong() {
        assert_eq!(
            plain("**very *much* so**"),
            "<strong>very <em>much</em> so</strong>"
        );
    }

    #[test]
    fn strong_nests_inside_emphasis() {
        assert_eq!(plain("*a **b** c*"), "<em>a <strong>b</strong> c</em>");
        assert_eq!(plain("_a **b** c_"), "<em>a <strong>b</strong> c</em>");
        assert_eq!(
            plain("*x* and **y** and *z*"),
            "<em>x</em> and <strong>y</strong> and <em>z</em>"
        );
    }

    #[test]
    fn code_span_content_is_verbatim() {
        assert_eq!(plain("`a *b* _c_`"), "<code>a *b* _c_</code>");
        assert_eq!(plain("use `x**2**`"), "use <code>x**2**</code>");
    }

    #[test]
    fn image_claimed_before_link() {
        assert_eq!(
            plain("![logo](img/logo.png)"),
            r#"<img src="img/logo.png" alt="logo">"#
        );
    }

    #[test]
    fn link_text_gets_spans_but_href_does_not() {
        assert_eq!(
            plain("[*docs*](https://example.com/a_b_c)"),
            r#"<a href="https://example.com/a_b_c"><em>docs</em></a>"#
        );
    }

    #[test]
    fn image_needs_alt_text() {
        assert_eq!(plain("![](x.png)"), "![](x.png)");
    }

    #[test]
    fn unmatched_delimiters_pass_through() {
        assert_eq!(plain("2 * 3"), "2 * 3");
        assert_eq!(plain("a `tick"), "a `tick");
        assert_eq!(plain("[text] (no link)"), "[text] (no link)");
    }

    #[test]
    fn escaping_happens_before_spans() {
        assert_eq!(
            render_inline("**a < b** & `<br>`", true),
            "<strong>a &lt; b</strong> &amp; <code>&lt;br&gt;</code>"
        );
    }

    #[test]
    fn raw_html_passes_when_not_escaping() {
        assert_eq!(plain("a <br> b"), "a <br> b");
    }
}
