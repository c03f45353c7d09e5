//! CLI binary for file-converter.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and reports results.

use anyhow::{Context, Result};
use clap::Parser;
use file_converter::{
    convert_batch, convert_file, convert_to_file, list_converters, require_strategy,
    ConversionConfig, ConversionProgressCallback, ProgressCallback, Strategy,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// Printed once per failed file; the error chain follows it.
const FAILURE_MESSAGE: &str = "Conversion failed";

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch plus a log line per
/// file. Files finish out of order, so start times are keyed by index.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn elapsed_secs(&self, index: usize) -> f64 {
        self.start_times
            .lock()
            .unwrap()
            .remove(&index)
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
    }

    fn on_file_start(&self, index: usize, _total: usize, input_name: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(index, Instant::now());
        self.bar.set_message(input_name.to_string());
    }

    fn on_file_complete(&self, index: usize, total: usize, output_name: &str, output_len: usize) {
        let secs = self.elapsed_secs(index);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<30}  {}  {}",
            green("✓"),
            index,
            total,
            output_name,
            dim(&format!("{output_len:>7} bytes")),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, index: usize, total: usize, _error: &str) {
        let secs = self.elapsed_secs(index);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            red(FAILURE_MESSAGE),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} file(s) converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} file(s) converted  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # List the available strategies
  fconv --list

  # Markdown to a styled HTML page (writes notes.html next to notes.md)
  fconv notes.md

  # Uppercase a text file (writes notes_upper.txt)
  fconv notes.txt

  # Pick the strategy explicitly
  fconv -s text-upper-rename notes.txt

  # Print the result instead of writing a file
  fconv --stdout README.md

  # Convert many files into one directory, 8 at a time
  fconv -c 8 -o out/ docs/*.md

  # Escape HTML in untrusted input and use your own CSS
  fconv --escape-html --stylesheet site.css page.md

STRATEGIES:
  ID                 Accepts  Output
  ─────────────────  ───────  ─────────────────────
  text-case          .txt     <name>_upper.txt
  markdown-to-html   .md      <name>.html
  text-upper-rename  .txt     <name>_converted.txt

  Without --strategy each file gets the first strategy that accepts it.
  A file the chosen strategy does not accept is reported and skipped.

ENVIRONMENT VARIABLES:
  Every flag can be set through an FCONV_* variable, e.g. FCONV_STRATEGY,
  FCONV_OUTPUT, FCONV_ESCAPE_HTML, FCONV_CONCURRENCY.
  RUST_LOG overrides the log filter.
"#;

/// Convert text files with a registry of named strategies.
#[derive(Parser, Debug)]
#[command(
    name = "fconv",
    version,
    about = "Convert text files: uppercase plain text, Markdown to HTML",
    long_about = "Convert files through a fixed registry of conversion strategies. \
Markdown becomes a standalone styled HTML page; plain text becomes uppercase text under \
a new name.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Files to convert.
    #[arg(required_unless_present = "list")]
    inputs: Vec<PathBuf>,

    /// Strategy id (see --list). Default: detected per file.
    #[arg(short, long, env = "FCONV_STRATEGY")]
    strategy: Option<String>,

    /// Output file for a single input, or output directory for several.
    #[arg(short, long, env = "FCONV_OUTPUT")]
    output: Option<PathBuf>,

    /// Print converted content to stdout instead of writing files.
    #[arg(long, env = "FCONV_STDOUT", conflicts_with = "output")]
    stdout: bool,

    /// List the registered strategies and exit.
    #[arg(long, env = "FCONV_LIST")]
    list: bool,

    /// Emit JSON (strategy list, or ConversionOutput with --stdout).
    #[arg(long, env = "FCONV_JSON")]
    json: bool,

    /// Escape &, <, > and " in generated HTML.
    #[arg(long, env = "FCONV_ESCAPE_HTML")]
    escape_html: bool,

    /// Reject files that are not valid UTF-8 instead of replacing bad bytes.
    #[arg(long, env = "FCONV_STRICT_UTF8")]
    strict_utf8: bool,

    /// CSS file to use instead of the built-in stylesheet.
    #[arg(long, env = "FCONV_STYLESHEET")]
    stylesheet: Option<PathBuf>,

    /// Number of files converted concurrently.
    #[arg(short, long, env = "FCONV_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Disable progress bar.
    #[arg(long, env = "FCONV_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FCONV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FCONV_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO logs would interleave with the bar, so the bar replaces them.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && !cli.stdout && !cli.list;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── List mode ────────────────────────────────────────────────────────
    if cli.list {
        print_strategies(cli.json)?;
        return Ok(ExitCode::SUCCESS);
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb).await?;

    // ── Run conversion ───────────────────────────────────────────────────
    let failures = if cli.stdout {
        run_stdout(&cli, &config).await?
    } else if let Some(target) = single_file_target(&cli) {
        run_single(&cli, &cli.inputs[0], target, &config).await
    } else {
        run_batch(&cli, &config).await?
    };

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Map CLI args to `ConversionConfig`. The CLI always checks file types.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .escape_html(cli.escape_html)
        .strict_utf8(cli.strict_utf8)
        .strict_file_types(true)
        .concurrency(cli.concurrency);

    if let Some(ref path) = cli.stylesheet {
        let css = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read stylesheet from {:?}", path))?;
        builder = builder.stylesheet(css);
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;
    tracing::debug!("Config: {:?}", config.settings());
    Ok(config)
}

fn print_strategies(json: bool) -> Result<()> {
    if json {
        let infos: Vec<_> = list_converters().iter().map(|s| s.info()).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&infos).context("Failed to serialise strategy list")?
        );
        return Ok(());
    }

    for s in list_converters() {
        println!(
            "{:<20} {}  {}",
            bold(s.id()),
            s.name(),
            dim(&format!("[{}]", s.accepted_extensions().join(", ")))
        );
        println!("{:<20} {}", "", dim(s.description()));
    }
    Ok(())
}

/// `-o` names a file (not a directory) and there is exactly one input.
fn single_file_target(cli: &Cli) -> Option<&Path> {
    let out = cli.output.as_deref()?;
    (cli.inputs.len() == 1 && !out.is_dir() && !ends_with_separator(out)).then_some(out)
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}

fn resolve_strategy(cli: &Cli, input: &Path) -> Result<Strategy> {
    if let Some(ref id) = cli.strategy {
        return Ok(Strategy::from_id(id)?);
    }
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(require_strategy(&name, None)?)
}

fn report_failure(input: &Path, err: &anyhow::Error) {
    eprintln!(
        "{} {}: {}\n  {}",
        red("✗"),
        FAILURE_MESSAGE,
        input.display(),
        dim(&format!("{err:#}"))
    );
}

async fn run_stdout(cli: &Cli, config: &ConversionConfig) -> Result<usize> {
    let mut failures = 0;
    let stdout = io::stdout();

    for input in &cli.inputs {
        let result = async {
            let strategy = resolve_strategy(cli, input)?;
            Ok::<_, anyhow::Error>(convert_file(strategy.id(), input, config).await?)
        }
        .await;

        match result {
            Ok(output) => {
                let mut handle = stdout.lock();
                if cli.json {
                    let json = serde_json::to_string_pretty(&output)
                        .context("Failed to serialise output")?;
                    writeln!(handle, "{json}").context("Failed to write to stdout")?;
                } else {
                    handle
                        .write_all(output.bytes())
                        .context("Failed to write to stdout")?;
                    if !output.content.ends_with('\n') {
                        handle.write_all(b"\n").ok();
                    }
                }
            }
            Err(e) => {
                failures += 1;
                report_failure(input, &e);
            }
        }
    }

    Ok(failures)
}

async fn run_single(cli: &Cli, input: &Path, target: &Path, config: &ConversionConfig) -> usize {
    let result = async {
        let strategy = resolve_strategy(cli, input)?;
        Ok::<_, anyhow::Error>(convert_to_file(strategy.id(), input, target, config).await?)
    }
    .await;

    match result {
        Ok(stats) => {
            if !cli.quiet {
                eprintln!(
                    "{}  {} bytes  →  {}",
                    green("✔"),
                    stats.output_bytes,
                    bold(&target.display().to_string()),
                );
            }
            0
        }
        Err(e) => {
            report_failure(input, &e);
            1
        }
    }
}

async fn run_batch(cli: &Cli, config: &ConversionConfig) -> Result<usize> {
    let results = convert_batch(
        cli.strategy.as_deref(),
        &cli.inputs,
        cli.output.as_deref(),
        config,
    )
    .await
    .context(FAILURE_MESSAGE)?;

    let mut failures = 0;
    for r in results {
        match r.outcome {
            Ok((path, stats)) => {
                if !cli.quiet && config.progress_callback.is_none() {
                    eprintln!(
                        "{}  {}  →  {}  {}",
                        green("✔"),
                        r.input.display(),
                        bold(&path.display().to_string()),
                        dim(&format!("{} bytes", stats.output_bytes)),
                    );
                }
            }
            Err(e) => {
                failures += 1;
                report_failure(&r.input, &anyhow::Error::new(e));
            }
        }
    }
    Ok(failures)
}
