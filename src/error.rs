//! Error types for the file-converter library.
//!
//! A single [`ConvertError`] covers every way a conversion attempt can end
//! early. All variants are terminal for that one attempt: no partial output
//! is produced and nothing is retried automatically. The variants are kept
//! distinct so a strict caller can tell a mistyped strategy id apart from a
//! file it cannot read, even though the CLI prints one generic message for
//! all of them.
//!
//! The Markdown renderer itself never fails; every error here comes from
//! strategy lookup, type checking, decoding, or file I/O.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the file-converter library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Lookup errors ─────────────────────────────────────────────────────
    /// No strategy is registered under the requested id.
    #[error("Unknown conversion strategy '{id}'\nRun `fconv --list` to see the available strategies.")]
    UnknownStrategy { id: String },

    /// The file matches none of the strategy's accepted extensions or MIME types.
    #[error(
        "Unsupported file type for '{filename}': strategy '{strategy}' accepts {}",
        accepted.join(", ")
    )]
    UnsupportedFileType {
        filename: String,
        strategy: String,
        accepted: Vec<String>,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The input file could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Transform errors ──────────────────────────────────────────────────
    /// The strategy could not transform the content.
    #[error("Conversion with '{strategy}' failed: {source}")]
    ConversionFailed {
        strategy: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConvertError {
    /// `true` when the strategy or file type was wrong, as opposed to a
    /// failure reading, decoding or writing.
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            ConvertError::UnknownStrategy { .. } | ConvertError::UnsupportedFileType { .. }
        )
    }
}
