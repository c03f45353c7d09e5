//! Concurrent conversion of many files.
//!
//! Each input is converted and written independently; one file failing
//! does not stop the others. At most `config.concurrency` files are in
//! flight at once. Results come back in input order regardless of which
//! file finished first.
//!
//! Output paths are worked out for the whole batch before anything is read.
//! When two inputs would write the same file, the first one in input order
//! keeps it and the later ones fail with `OutputWriteFailed`.

use crate::config::ConversionConfig;
use crate::convert::convert_into_dir_with;
use crate::error::ConvertError;
use crate::output::ConversionStats;
use crate::pipeline::input::{file_name, output_path};
use crate::registry::{require_strategy, Strategy};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct FileResult {
    /// 0-indexed position of the file in the batch.
    pub index: usize,
    pub input: PathBuf,
    /// Path written and its stats, or why the file was skipped.
    pub outcome: Result<(PathBuf, ConversionStats), ConvertError>,
}

impl FileResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Convert every file in `inputs`, writing each result next to its input or
/// into `output_dir`.
///
/// With `strategy` set, every file uses that strategy and an unknown id fails
/// the whole call before any file is touched. Without it, each file gets the
/// first registered strategy that accepts its name.
pub async fn convert_batch(
    strategy: Option<&str>,
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    config: &ConversionConfig,
) -> Result<Vec<FileResult>, ConvertError> {
    let fixed = strategy.map(Strategy::from_id).transpose()?;
    let total = inputs.len();
    info!("Converting {} file(s), {} at a time", total, config.concurrency);

    let plans = plan(fixed, inputs, output_dir);

    if let Some(cb) = &config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut results: Vec<FileResult> = stream::iter(inputs.iter().zip(plans).enumerate().map(
        |(index, (input, plan))| async move {
            let name = file_name(input);
            if let Some(cb) = &config.progress_callback {
                cb.on_file_start(index + 1, total, &name);
            }

            let outcome = match plan {
                Ok(s) => convert_into_dir_with(s, input, output_dir, config).await,
                Err(e) => Err(e),
            };

            match &outcome {
                Ok((path, stats)) => {
                    if let Some(cb) = &config.progress_callback {
                        cb.on_file_complete(index + 1, total, &file_name(path), stats.output_bytes);
                    }
                }
                Err(e) => {
                    warn!("Failed to convert {}: {}", input.display(), e);
                    if let Some(cb) = &config.progress_callback {
                        cb.on_file_error(index + 1, total, &e.to_string());
                    }
                }
            }

            FileResult {
                index,
                input: input.clone(),
                outcome,
            }
        },
    ))
    .buffer_unordered(config.concurrency)
    .collect()
    .await;

    results.sort_by_key(|r| r.index);

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    info!("Batch complete: {}/{} file(s) converted", succeeded, total);
    if let Some(cb) = &config.progress_callback {
        cb.on_batch_complete(total, succeeded);
    }

    Ok(results)
}

/// Pick a strategy for every input and reserve its output path.
fn plan(
    fixed: Option<Strategy>,
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
) -> Vec<Result<Strategy, ConvertError>> {
    let mut claimed: HashSet<PathBuf> = HashSet::with_capacity(inputs.len());

    inputs
        .iter()
        .map(|input| {
            let name = file_name(input);
            let strategy = match fixed {
                Some(s) => s,
                None => require_strategy(&name, None)?,
            };
            let target = output_path(input, output_dir, &strategy.output_filename(&name));
            if !claimed.insert(target_key(&target)) {
                return Err(ConvertError::OutputWriteFailed {
                    path: target,
                    source: std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "an earlier input in this batch writes the same file",
                    ),
                });
            }
            Ok(strategy)
        })
        .collect()
}

/// Compare targets by their resolved directory, so `out/x` and `./out/x`
/// collide.
fn target_key(target: &Path) -> PathBuf {
    let parent = target.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = match parent {
        Some(p) => std::fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf()),
        None => std::env::current_dir().unwrap_or_default(),
    };
    match target.file_name() {
        Some(name) => dir.join(name),
        None => target.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_rejects_second_writer_of_a_target() {
        let inputs = vec![PathBuf::from("notes.md"), PathBuf::from("notes.txt")];
        let plans = plan(Some(Strategy::MarkdownToHtml), &inputs, None);
        assert_eq!(plans[0].as_ref().unwrap(), &Strategy::MarkdownToHtml);
        match &plans[1] {
            Err(ConvertError::OutputWriteFailed { path, source }) => {
                assert_eq!(path, &PathBuf::from("notes.html"));
                assert_eq!(source.kind(), std::io::ErrorKind::AlreadyExists);
            }
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn plan_detects_collisions_across_directories() {
        let inputs = vec![PathBuf::from("a/x.md"), PathBuf::from("b/x.md")];
        let plans = plan(None, &inputs, Some(Path::new("out")));
        assert!(plans[0].is_ok());
        assert!(matches!(plans[1], Err(ConvertError::OutputWriteFailed { .. })));

        // Without an output directory they land next to their inputs.
        let plans = plan(None, &inputs, None);
        assert!(plans.iter().all(|p| p.is_ok()));
    }

    #[test]
    fn plan_reports_undetectable_files() {
        let plans = plan(None, &[PathBuf::from("a.png")], None);
        assert!(matches!(
            plans[0],
            Err(ConvertError::UnsupportedFileType { ref strategy, .. }) if strategy == "auto"
        ));
    }

    #[tokio::test]
    async fn unknown_strategy_fails_whole_batch() {
        let inputs = vec![PathBuf::from("/does/not/exist.txt")];
        let err = convert_batch(Some("bogus"), &inputs, None, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnknownStrategy { .. }));
    }

    #[tokio::test]
    async fn empty_batch() {
        let results = convert_batch(None, &[], None, &ConversionConfig::default())
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
