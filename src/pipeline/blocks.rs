//! Line classification and list grouping.
//!
//! Every source line is tagged with exactly one [`Block`] kind before any
//! HTML is produced, so later stages never have to guess whether a line was
//! already claimed by another rule. Precedence, highest first:
//!
//! 1. fenced code (claims all lines up to the closing fence)
//! 2. heading
//! 3. list item (unordered, then ordered)
//! 4. blockquote
//! 5. horizontal rule
//! 6. raw HTML line
//! 7. blank
//! 8. paragraph (catch-all)
//!
//! [`group_lists`] then folds each maximal run of same-kind list items into
//! a single [`Node::List`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Which container a list item belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `-`, `+` or `*` marker; rendered inside `<ul>`.
    Unordered,
    /// `<digits>.` marker; rendered inside `<ol>`.
    Ordered,
}

/// One classified line (or, for code, a run of lines) of Markdown source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Heading { level: u8, text: &'a str },
    Paragraph(&'a str),
    ListItem { kind: ListKind, text: &'a str },
    /// Lines between the fences, without the fences themselves.
    CodeBlock { info: &'a str, lines: Vec<&'a str> },
    Blockquote(&'a str),
    HorizontalRule,
    /// A line that already starts with a lowercase HTML tag.
    RawHtml(&'a str),
    Blank,
}

/// A block after list grouping. List items only ever appear inside `List`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    Block(Block<'a>),
    List { kind: ListKind, items: Vec<&'a str> },
}

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6}) (.*)$").unwrap());
static RE_UNORDERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-+*]\s+(\S.*)$").unwrap());
static RE_ORDERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\.\s+(\S.*)$").unwrap());
static RE_BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^>\s+(\S.*)$").unwrap());
static RE_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:---|\*\*\*|___)\s*$").unwrap());
static RE_RAW_HTML: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<[a-z]").unwrap());
static RE_FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*```\s*([^`]*?)\s*$").unwrap());
static RE_FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*```\s*$").unwrap());
static RE_FENCE_ONE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*```(.*?)```\s*$").unwrap());

/// Split `source` into classified blocks, top to bottom.
pub fn classify(source: &str) -> Vec<Block<'_>> {
    let lines: Vec<&str> = source.lines().collect();
    let mut blocks = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        if let Some((block, consumed)) = fenced_code(&lines[i..]) {
            blocks.push(block);
            i += consumed;
            continue;
        }
        blocks.push(classify_line(lines[i]));
        i += 1;
    }

    blocks
}

/// Fold each maximal run of same-kind list items into one [`Node::List`].
///
/// Any other block, including a blank line, ends the run.
pub fn group_lists(blocks: Vec<Block<'_>>) -> Vec<Node<'_>> {
    let mut nodes: Vec<Node<'_>> = Vec::with_capacity(blocks.len());

    for block in blocks {
        match block {
            Block::ListItem { kind, text } => match nodes.last_mut() {
                Some(Node::List { kind: open, items }) if *open == kind => items.push(text),
                _ => nodes.push(Node::List {
                    kind,
                    items: vec![text],
                }),
            },
            other => nodes.push(Node::Block(other)),
        }
    }

    nodes
}

/// Claim a fenced code block starting at `lines[0]`.
///
/// Returns the block and the number of lines it spans, or `None` when the
/// first line is not a fence or the fence is never closed. Only a bare
/// fence closes a block; a fence with an info string is content.
fn fenced_code<'a>(lines: &[&'a str]) -> Option<(Block<'a>, usize)> {
    let first = *lines.first()?;

    if let Some(caps) = RE_FENCE_ONE_LINE.captures(first) {
        let code = caps.get(1).map_or("", |m| m.as_str());
        return Some((
            Block::CodeBlock {
                info: "",
                lines: vec![code],
            },
            1,
        ));
    }

    let caps = RE_FENCE_OPEN.captures(first)?;
    let info = caps.get(1).map_or("", |m| m.as_str());
    let close = lines[1..]
        .iter()
        .position(|l| RE_FENCE_CLOSE.is_match(l))?;

    Some((
        Block::CodeBlock {
            info,
            lines: lines[1..=close].to_vec(),
        },
        close + 2,
    ))
}

fn classify_line(line: &str) -> Block<'_> {
    if line.trim().is_empty() {
        return Block::Blank;
    }
    if let Some(caps) = RE_HEADING.captures(line) {
        return Block::Heading {
            level: caps[1].len() as u8,
            text: caps.get(2).map_or("", |m| m.as_str().trim_end()),
        };
    }
    if let Some(m) = RE_UNORDERED.captures(line).and_then(|c| c.get(1)) {
        return Block::ListItem {
            kind: ListKind::Unordered,
            text: m.as_str().trim_end(),
        };
    }
    if let Some(m) = RE_ORDERED.captures(line).and_then(|c| c.get(1)) {
        return Block::ListItem {
            kind: ListKind::Ordered,
            text: m.as_str().trim_end(),
        };
    }
    if let Some(m) = RE_BLOCKQUOTE.captures(line).and_then(|c| c.get(1)) {
        return Block::Blockquote(m.as_str().trim_end());
    }
    if RE_RULE.is_match(line) {
        return Block::HorizontalRule;
    }
    if RE_RAW_HTML.is_match(line) {
        return Block::RawHtml(line);
    }
    Block::Paragraph(line)
}
