//! Markdown → HTML fragment rendering.
//!
//! [`render_markdown`] is total: any input produces some fragment, and input
//! with no Markdown syntax comes back wrapped in `<p>` elements, one per
//! non-blank line. The stages run in a fixed order:
//!
//! ```text
//! source ─▶ normalise ─▶ classify ─▶ group lists ─▶ render nodes ─▶ assemble
//!           (postprocess) (blocks)    (blocks)       (this module)  (postprocess)
//! ```

use crate::pipeline::blocks::{self, Block, ListKind, Node};
use crate::pipeline::inline::render_inline;
use crate::pipeline::postprocess;

/// Switches for the renderer. The default reproduces unescaped output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Escape `&`, `<`, `>` and `"` in text, code and attribute values.
    pub escape_html: bool,
}

/// Render Markdown source to an HTML fragment with default options.
///
/// # Example
/// ```rust
/// use file_converter::render_markdown;
///
/// let html = render_markdown("# Title\n\nSome *text*.");
/// assert_eq!(html, "<h1>Title</h1>\n<p>Some <em>text</em>.</p>");
/// ```
pub fn render_markdown(source: &str) -> String {
    render_markdown_with(source, &RenderOptions::default())
}

/// Render Markdown source to an HTML fragment.
pub fn render_markdown_with(source: &str, options: &RenderOptions) -> String {
    let source = postprocess::normalise_source(source);
    let nodes = blocks::group_lists(blocks::classify(&source));
    postprocess::assemble_fragment(nodes.iter().filter_map(|n| render_node(n, options)))
}

/// Escape the characters that would otherwise be read as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render one node, or `None` for nodes that produce no output (blank lines).
fn render_node(node: &Node<'_>, options: &RenderOptions) -> Option<String> {
    let escape = options.escape_html;
    let html = match node {
        Node::List { kind, items } => render_list(*kind, items, escape),
        Node::Block(block) => match block {
            Block::Heading { level, text } => {
                format!("<h{level}>{}</h{level}>", render_inline(text, escape))
            }
            Block::Paragraph(text) => format!("<p>{}</p>", render_inline(text, escape)),
            Block::Blockquote(text) => {
                format!("<blockquote>{}</blockquote>", render_inline(text, escape))
            }
            Block::HorizontalRule => "<hr>".to_string(),
            Block::CodeBlock { info, lines } => render_code_block(info, lines, escape),
            Block::RawHtml(line) if escape => format!("<p>{}</p>", render_inline(line, true)),
            Block::RawHtml(line) => (*line).to_string(),
            // Grouping never leaves a bare item behind.
            Block::ListItem { kind, text } => render_list(*kind, &[*text], escape),
            Block::Blank => return None,
        },
    };
    Some(html)
}

fn render_list(kind: ListKind, items: &[&str], escape: bool) -> String {
    let tag = match kind {
        ListKind::Unordered => "ul",
        ListKind::Ordered => "ol",
    };
    let mut html = format!("<{tag}>\n");
    for item in items {
        html.push_str("<li>");
        html.push_str(&render_inline(item, escape));
        html.push_str("</li>\n");
    }
    html.push_str(&format!("</{tag}>"));
    html
}

fn render_code_block(info: &str, lines: &[&str], escape: bool) -> String {
    let code = lines.join("\n");
    let code = if escape { escape_html(&code) } else { code };
    match language_class(info) {
        Some(lang) => format!(r#"<pre><code class="language-{lang}">{code}</code></pre>"#),
        None => format!("<pre><code>{code}</code></pre>"),
    }
}

/// First word of a fence info string, if it is safe to put in a class name.
fn language_class(info: &str) -> Option<&str> {
    let word = info.split_whitespace().next()?;
    word.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.' | '#'))
        .then_some(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(source: &str) -> String {
        render_markdown_with(source, &RenderOptions { escape_html: true })
    }

    #[test]
    fn render_is_deterministic() {
        let src = "# T\n\n- a\n- **b**\n\n```\ncode\n```\n> q\n---\ntext [l](u)";
        assert_eq!(render_markdown(src), render_markdown(src));
    }

    #[test]
    fn plain_line_becomes_one_paragraph() {
        assert_eq!(render_markdown("hello world"), "<p>hello world</p>");
    }

    #[test]
    fn heading_and_emphasis() {
        let html = render_markdown("# Title\n\nSome *text*.");
        assert_eq!(html.matches("<h1>").count(), 1);
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>Some <em>text</em>.</p>"));
    }

    #[test]
    fn three_items_one_list() {
        assert_eq!(
            render_markdown("- a\n- b\n- c"),
            "<ul>\n<li>a</li>\n<li>b</li>\n<li>c</li>\n</ul>"
        );
    }

    #[test]
    fn ordered_list() {
        assert_eq!(
            render_markdown("1. first\n2. second"),
            "<ol>\n<li>first</li>\n<li>second</li>\n</ol>"
        );
    }

    #[test]
    fn inline_code_alone() {
        let html = render_markdown("`code`");
        assert_eq!(html, "<p><code>code</code></p>");
        assert!(!html.contains("<em>"));
    }

    #[test]
    fn fenced_block_is_verbatim() {
        let html = render_markdown("```\nx = 1\n```");
        assert_eq!(html, "<pre><code>x = 1</code></pre>");
    }

    #[test]
    fn fenced_block_keeps_markdown_and_blank_lines() {
        let html = render_markdown("```\n*a*\n\n# b\n```");
        assert_eq!(html, "<pre><code>*a*\n\n# b</code></pre>");
    }

    #[test]
    fn fence_info_becomes_class() {
        assert_eq!(
            render_markdown("```rust\nfn main() {}\n```"),
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
        assert_eq!(
            render_markdown("```\"><script>\nx\n```"),
            "<pre><code>x</code></pre>"
        );
    }

    #[test]
    fn blockquote_lines_are_separate() {
        assert_eq!(
            render_markdown("> one\n> *two*"),
            "<blockquote>one</blockquote>\n<blockquote><em>two</em></blockquote>"
        );
    }

    #[test]
    fn rules() {
        assert_eq!(
            render_markdown("a\n\n---\n\n***\n___\nb"),
            "<p>a</p>\n<hr>\n<hr>\n<hr>\n<p>b</p>"
        );
    }

    #[test]
    fn blank_runs_collapse() {
        assert_eq!(render_markdown("a\n\n\n\n\nb"), "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn link_inside_list_item() {
        assert_eq!(
            render_markdown("- see [docs](https://d.rs)"),
            "<ul>\n<li>see <a href=\"https://d.rs\">docs</a></li>\n</ul>"
        );
    }

    #[test]
    fn raw_html_line_is_not_wrapped() {
        assert_eq!(render_markdown("<div>x</div>"), "<div>x</div>");
    }

    #[test]
    fn escaping_option() {
        assert_eq!(escaped("a < b & c"), "<p>a &lt; b &amp; c</p>");
        assert_eq!(escaped("<div>x</div>"), "<p>&lt;div&gt;x&lt;/div&gt;</p>");
        assert_eq!(escaped("```\n<b>\n```"), "<pre><code>&lt;b&gt;</code></pre>");
    }

    #[test]
    fn no_escaping_by_default() {
        assert_eq!(render_markdown("a < b & c"), "<p>a < b & c</p>");
    }

    #[test]
    fn crlf_input() {
        assert_eq!(
            render_markdown("# T\r\n\r\n- a\r\n- b\r\n"),
            render_markdown("# T\n\n- a\n- b\n")
        );
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(render_markdown(""), "");
        assert_eq!(render_markdown("\n  \n\t\n"), "");
    }

    #[test]
    fn escape_html_helper() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }
}
