//! Conversion entry points.
//!
//! [`convert`] works on a [`Document`] already in memory and performs no I/O.
//! [`convert_file`] reads from disk first, and [`convert_to_file`] /
//! [`convert_into_dir`] also write the result. Writes are atomic: the content
//! goes to a temporary sibling file which is then renamed over the target, so
//! a failed write never leaves a half-written output behind.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::input::{self, Document};
use crate::registry::Strategy;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Convert an in-memory document with the strategy registered under
/// `strategy_id`.
///
/// An unknown id fails with [`ConvertError::UnknownStrategy`] before the
/// document is looked at.
///
/// # Example
/// ```rust
/// use file_converter::{convert, ConversionConfig, Document};
///
/// let doc = Document::new("notes.txt", "hello");
/// let out = convert("text-case", &doc, &ConversionConfig::default()).unwrap();
/// assert_eq!(out.filename, "notes_upper.txt");
/// assert_eq!(out.content, "HELLO");
/// ```
pub fn convert(
    strategy_id: &str,
    doc: &Document,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let strategy = Strategy::from_id(strategy_id)?;
    convert_with(strategy, doc, config)
}

/// Convert an in-memory document with an already resolved strategy.
pub fn convert_with(
    strategy: Strategy,
    doc: &Document,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    if config.strict_file_types {
        strategy.check_accepted(doc)?;
    }

    info!("Converting '{}' with {}", doc.filename, strategy);
    let start = Instant::now();
    let content = strategy.transform(doc, config)?;
    let stats = ConversionStats {
        input_bytes: doc.bytes.len(),
        output_bytes: content.len(),
        duration_us: start.elapsed().as_micros() as u64,
    };
    let filename = strategy.output_filename(&doc.filename);
    debug!(
        "'{}' -> '{}': {} -> {} bytes in {}µs",
        doc.filename, filename, stats.input_bytes, stats.output_bytes, stats.duration_us
    );

    Ok(ConversionOutput {
        strategy,
        filename,
        mime_type: strategy.output_mime_type(),
        content,
        stats,
    })
}

/// Read `path` and convert it.
///
/// The strategy id, and with `strict_file_types` the file name, are checked
/// before the file is opened.
pub async fn convert_file(
    strategy_id: &str,
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let path = path.as_ref();
    let strategy = preflight(strategy_id, path, config)?;
    let doc = Document::read(path).await?;
    convert_with(strategy, &doc, config)
}

/// Blocking variant of [`convert_file`].
pub fn convert_file_sync(
    strategy_id: &str,
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let path = path.as_ref();
    let strategy = preflight(strategy_id, path, config)?;
    let doc = Document::read_sync(path)?;
    convert_with(strategy, &doc, config)
}

/// Convert `input` and write the result to `output_path`.
///
/// Missing parent directories are created.
pub async fn convert_to_file(
    strategy_id: &str,
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, ConvertError> {
    let output = convert_file(strategy_id, input, config).await?;
    write_atomic(output_path.as_ref(), output.bytes()).await?;
    Ok(output.stats)
}

/// Convert `input` and write the result under the strategy's suggested name,
/// either next to the input or inside `dir`.
///
/// Returns the path written. Refuses to overwrite the input itself, which
/// happens when a strategy leaves the name unchanged.
pub async fn convert_into_dir(
    strategy_id: &str,
    input: impl AsRef<Path>,
    dir: Option<&Path>,
    config: &ConversionConfig,
) -> Result<(PathBuf, ConversionStats), ConvertError> {
    let strategy = Strategy::from_id(strategy_id)?;
    convert_into_dir_with(strategy, input.as_ref(), dir, config).await
}

pub(crate) async fn convert_into_dir_with(
    strategy: Strategy,
    input: &Path,
    dir: Option<&Path>,
    config: &ConversionConfig,
) -> Result<(PathBuf, ConversionStats), ConvertError> {
    let output = convert_file(strategy.id(), input, config).await?;
    let target = input::output_path(input, dir, &output.filename);

    if same_file(input, &target) {
        return Err(ConvertError::OutputWriteFailed {
            path: target,
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "refusing to overwrite input",
            ),
        });
    }

    write_atomic(&target, output.bytes()).await?;
    info!("Wrote {}", target.display());
    Ok((target, output.stats))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn preflight(
    strategy_id: &str,
    path: &Path,
    config: &ConversionConfig,
) -> Result<Strategy, ConvertError> {
    let strategy = Strategy::from_id(strategy_id)?;
    if config.strict_file_types {
        let name = input::file_name(path);
        if !strategy.accepts(&name, None) {
            return Err(strategy.unsupported(&name));
        }
    }
    Ok(strategy)
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let write_err = |e: std::io::Error| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}
