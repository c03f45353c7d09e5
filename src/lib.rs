//! # file-converter
//!
//! Convert text files between formats through a small registry of named
//! strategies: uppercase plain text, or render Markdown into a standalone
//! styled HTML page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Lookup    resolve the strategy id (or detect it from the file name)
//!  ├─ 2. Input     read bytes, decode UTF-8 (lossy unless strict)
//!  ├─ 3. Transform uppercase, or Markdown → HTML fragment → document
//!  └─ 4. Output    suggested file name + MIME type, atomic write
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use file_converter::{convert, list_converters, ConversionConfig, Document};
//!
//! for s in list_converters() {
//!     println!("{:<20} {}", s.id(), s.name());
//! }
//!
//! let doc = Document::new("notes.md", "# Notes\n\n- one\n- two");
//! let out = convert("markdown-to-html", &doc, &ConversionConfig::default()).unwrap();
//! assert_eq!(out.filename, "notes.html");
//! assert!(out.content.contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `fconv` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! file-converter = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod registry;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{convert_batch, FileResult};
pub use config::{ConfigSettings, ConversionConfig, ConversionConfigBuilder};
pub use convert::{
    convert, convert_file, convert_file_sync, convert_into_dir, convert_to_file, convert_with,
};
pub use error::ConvertError;
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::input::Document;
pub use pipeline::render::{render_markdown, render_markdown_with, RenderOptions};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use registry::{detect_strategy, list_converters, require_strategy, Strategy, StrategyInfo};
