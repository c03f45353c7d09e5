//! Pipeline stages for Markdown-to-HTML conversion.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and none of them depends on the order of the others
//! beyond the data it is handed.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ postprocess ──▶ blocks ──▶ render ──▶ postprocess ──▶ template
//! (bytes)   (normalise)     (classify, (nodes +    (assemble)      (HTML doc)
//!                            group)     inline)
//! ```
//!
//! 1. [`input`]: the [`input::Document`] unit of work and UTF-8 decoding
//! 2. [`postprocess`]: line-ending normalisation and fragment assembly
//! 3. [`blocks`]: line classification and list grouping
//! 4. [`inline`]: code, image, link, strong and emphasis spans
//! 5. [`render`]: nodes to HTML elements
//! 6. [`template`]: the standalone document skeleton and stylesheet

pub mod blocks;
pub mod inline;
pub mod input;
pub mod postprocess;
pub mod render;
pub mod template;
