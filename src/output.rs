//! Result types returned by the conversion entry points.

use crate::registry::Strategy;
use serde::Serialize;

/// The converted content of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutput {
    /// Strategy that produced this output.
    pub strategy: Strategy,
    /// Suggested output file name.
    pub filename: String,
    /// MIME type of `content`.
    pub mime_type: &'static str,
    /// Converted text (always UTF-8).
    pub content: String,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    pub fn bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.content.into_bytes()
    }
}

/// Size and timing figures for one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub input_bytes: usize,
    pub output_bytes: usize,
    /// Time spent in the transform, in microseconds.
    pub duration_us: u64,
}
