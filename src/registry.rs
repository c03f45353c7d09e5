//! The converter registry: a closed set of conversion strategies.
//!
//! Every strategy is a variant of [`Strategy`], so adding one is a
//! compile-checked change to this enum and its `match` arms rather than a
//! new object that happens to have the right fields. [`list_converters`]
//! returns them in registration order, which is also the order
//! [`detect_strategy`] tries them in.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::pipeline::input::Document;
use crate::pipeline::render::render_markdown_with;
use crate::pipeline::template::wrap_document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named conversion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Plain text → uppercase text, saved as `<name>_upper.txt`.
    TextCase,
    /// Markdown → standalone styled HTML document.
    MarkdownToHtml,
    /// Plain text → uppercase text, saved as `<name>_converted.txt`.
    TextUpperRename,
}

/// All strategies in registration order.
pub const STRATEGIES: [Strategy; 3] = [
    Strategy::TextCase,
    Strategy::MarkdownToHtml,
    Strategy::TextUpperRename,
];

/// The registered strategies, in registration order.
pub fn list_converters() -> &'static [Strategy] {
    &STRATEGIES
}

/// First registered strategy that accepts the file, if any.
pub fn detect_strategy(filename: &str, mime: Option<&str>) -> Option<Strategy> {
    STRATEGIES.into_iter().find(|s| s.accepts(filename, mime))
}

/// Like [`detect_strategy`], but a file no strategy accepts is an
/// [`ConvertError::UnsupportedFileType`] listing every accepted extension.
pub fn require_strategy(filename: &str, mime: Option<&str>) -> Result<Strategy, ConvertError> {
    detect_strategy(filename, mime).ok_or_else(|| {
        let mut accepted: Vec<String> = Vec::new();
        for ext in STRATEGIES.iter().flat_map(|s| s.accepted_extensions()) {
            if !accepted.iter().any(|a| a == ext) {
                accepted.push(ext.to_string());
            }
        }
        ConvertError::UnsupportedFileType {
            filename: filename.to_string(),
            strategy: "auto".to_string(),
            accepted,
        }
    })
}

/// Presentation data for one strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub accepted_extensions: &'static [&'static str],
    pub accepted_mime_types: &'static [&'static str],
}

impl Strategy {
    pub fn id(self) -> &'static str {
        match self {
            Strategy::TextCase => "text-case",
            Strategy::MarkdownToHtml => "markdown-to-html",
            Strategy::TextUpperRename => "text-upper-rename",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::TextCase => "Text Case Converter",
            Strategy::MarkdownToHtml => "Markdown to HTML Converter",
            Strategy::TextUpperRename => "Uppercase and Rename",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Strategy::TextCase => "Converts text file content to uppercase",
            Strategy::MarkdownToHtml => "Converts Markdown files to formatted HTML documents",
            Strategy::TextUpperRename => {
                "Converts text file content to uppercase and saves it under a new name"
            }
        }
    }

    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            Strategy::TextCase | Strategy::TextUpperRename => &[".txt"],
            Strategy::MarkdownToHtml => &[".md"],
        }
    }

    pub fn accepted_mime_types(self) -> &'static [&'static str] {
        match self {
            Strategy::TextCase | Strategy::TextUpperRename => &["text/plain"],
            Strategy::MarkdownToHtml => &["text/markdown", "text/x-markdown"],
        }
    }

    /// MIME type of the converted output.
    pub fn output_mime_type(self) -> &'static str {
        match self {
            Strategy::TextCase | Strategy::TextUpperRename => "text/plain",
            Strategy::MarkdownToHtml => "text/html",
        }
    }

    /// Look a strategy up by its id.
    pub fn from_id(id: &str) -> Result<Self, ConvertError> {
        STRATEGIES
            .into_iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| ConvertError::UnknownStrategy { id: id.to_string() })
    }

    pub fn info(self) -> StrategyInfo {
        StrategyInfo {
            id: self.id(),
            name: self.name(),
            description: self.description(),
            accepted_extensions: self.accepted_extensions(),
            accepted_mime_types: self.accepted_mime_types(),
        }
    }

    /// Whether a file is an accepted input.
    ///
    /// The extension is matched first (case-insensitive suffix match); the
    /// reported MIME type, ignoring any `;` parameters, is the fallback.
    pub fn accepts(self, filename: &str, mime: Option<&str>) -> bool {
        let lower = filename.to_ascii_lowercase();
        if self
            .accepted_extensions()
            .iter()
            .any(|ext| lower.ends_with(ext))
        {
            return true;
        }
        let Some(mime) = mime else {
            return false;
        };
        let essence = mime.split(';').next().unwrap_or("").trim();
        self.accepted_mime_types()
            .iter()
            .any(|m| m.eq_ignore_ascii_case(essence))
    }

    /// Fail with [`ConvertError::UnsupportedFileType`] unless `doc` is accepted.
    pub fn check_accepted(self, doc: &Document) -> Result<(), ConvertError> {
        if self.accepts(&doc.filename, doc.mime_type.as_deref()) {
            Ok(())
        } else {
            Err(self.unsupported(&doc.filename))
        }
    }

    pub(crate) fn unsupported(self, filename: &str) -> ConvertError {
        ConvertError::UnsupportedFileType {
            filename: filename.to_string(),
            strategy: self.id().to_string(),
            accepted: self
                .accepted_extensions()
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    /// Suggested name for the converted file.
    ///
    /// The text strategies replace the first `.txt` in the name; the
    /// Markdown strategy replaces a trailing `.md` or `.txt` with `.html` and
    /// leaves other names unchanged. Both matches are case-sensitive, so
    /// `README.MD` keeps its name.
    pub fn output_filename(self, input: &str) -> String {
        match self {
            Strategy::TextCase => input.replacen(".txt", "_upper.txt", 1),
            Strategy::TextUpperRename => input.replacen(".txt", "_converted.txt", 1),
            Strategy::MarkdownToHtml => [".md", ".txt"]
                .iter()
                .find_map(|ext| input.strip_suffix(*ext))
                .map(|stem| format!("{stem}.html"))
                .unwrap_or_else(|| input.to_string()),
        }
    }

    /// Transform the document's content. Output naming is handled separately.
    pub fn transform(self, doc: &Document, config: &ConversionConfig) -> Result<String, ConvertError> {
        let text = doc
            .text(config.strict_utf8)
            .map_err(|e| ConvertError::ConversionFailed {
                strategy: self.id().to_string(),
                source: Box::new(e),
            })?;

        Ok(match self {
            Strategy::TextCase | Strategy::TextUpperRename => text.to_uppercase(),
            Strategy::MarkdownToHtml => {
                let fragment = render_markdown_with(&text, &config.render_options());
                wrap_document(
                    &doc.filename,
                    &fragment,
                    config.stylesheet.as_deref(),
                    config.escape_html,
                )
            }
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Strategy {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::from_id(s)
    }
}
