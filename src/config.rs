//! Configuration types for file conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the plain
//! behaviour of the converters: lossy UTF-8 decoding, no HTML escaping, the
//! built-in stylesheet, and no accepted-type check inside `convert` (the
//! caller is expected to filter files before handing them over).

use crate::error::ConvertError;
use crate::pipeline::render::RenderOptions;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use file_converter::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .escape_html(true)
///     .concurrency(8)
///     .build()
///     .unwrap();
/// assert!(config.escape_html);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Escape `&`, `<`, `>` and `"` in rendered Markdown. Default: false.
    ///
    /// Off by default so raw inline HTML in the source passes through
    /// untouched. Turn it on when the input is untrusted.
    pub escape_html: bool,

    /// Reject files whose name and MIME type match none of the strategy's
    /// accepted types. Default: false.
    pub strict_file_types: bool,

    /// Fail with [`ConvertError::ConversionFailed`] on invalid UTF-8 instead
    /// of substituting U+FFFD. Default: false.
    pub strict_utf8: bool,

    /// CSS placed in the `<style>` block of generated HTML documents.
    /// If None, uses the built-in stylesheet.
    pub stylesheet: Option<String>,

    /// Number of files converted at once by [`crate::convert_batch`]. Default: 4.
    pub concurrency: usize,

    /// Optional per-file progress events for batch conversion.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            escape_html: false,
            strict_file_types: false,
            strict_utf8: false,
            stylesheet: None,
            concurrency: 4,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("escape_html", &self.escape_html)
            .field("strict_file_types", &self.strict_file_types)
            .field("strict_utf8", &self.strict_utf8)
            .field("stylesheet", &self.stylesheet.as_ref().map(|s| s.len()))
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Options consumed by the Markdown renderer.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            escape_html: self.escape_html,
        }
    }

    /// Snapshot of the serialisable settings, for logging and `--json` output.
    pub fn settings(&self) -> ConfigSettings {
        ConfigSettings {
            escape_html: self.escape_html,
            strict_file_types: self.strict_file_types,
            strict_utf8: self.strict_utf8,
            custom_stylesheet: self.stylesheet.is_some(),
            concurrency: self.concurrency,
        }
    }
}

/// The plain-data part of a [`ConversionConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSettings {
    pub escape_html: bool,
    pub strict_file_types: bool,
    pub strict_utf8: bool,
    pub custom_stylesheet: bool,
    pub concurrency: usize,
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn escape_html(mut self, v: bool) -> Self {
        self.config.escape_html = v;
        self
    }

    pub fn strict_file_types(mut self, v: bool) -> Self {
        self.config.strict_file_types = v;
        self
    }

    pub fn strict_utf8(mut self, v: bool) -> Self {
        self.config.strict_utf8 = v;
        self
    }

    pub fn stylesheet(mut self, css: impl Into<String>) -> Self {
        self.config.stylesheet = Some(css.into());
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(ConvertError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if let Some(css) = &c.stylesheet {
            if css.contains("</style") {
                return Err(ConvertError::InvalidConfig(
                    "Stylesheet must not contain a closing </style> tag".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_permissive() {
        let c = ConversionConfig::default();
        assert!(!c.escape_html);
        assert!(!c.strict_file_types);
        assert!(!c.strict_utf8);
        assert!(c.stylesheet.is_none());
        assert_eq!(c.concurrency, 4);
    }

    #[test]
    fn zero_concurrency_rejected() {
        let err = ConversionConfig::builder().concurrency(0).build().unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
    }

    #[test]
    fn stylesheet_cannot_close_style_block() {
        let err = ConversionConfig::builder()
            .stylesheet("body{} </style><script>")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("</style>"));
    }

    #[test]
    fn render_options_follow_escape_flag() {
        let c = ConversionConfig::builder().escape_html(true).build().unwrap();
        assert!(c.render_options().escape_html);
    }

    #[test]
    fn settings_snapshot() {
        let c = ConversionConfig::builder()
            .stylesheet("p { color: red; }")
            .concurrency(2)
            .build()
            .unwrap();
        let s = c.settings();
        assert!(s.custom_stylesheet);
        assert_eq!(s.concurrency, 2);
    }
}
