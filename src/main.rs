mod cli;
mod config;
mod json_file;
mod manifest;
mod metadata;
mod signature;
mod sync;
mod targets;

use anyhow::Context;
use cli::{Cli, LogLevel};
use config::SyncConfig;
use std::fmt as stdfmt;
use std::io::{IsTerminal, stderr, stdout};
use std::path::Path;
use std::process::ExitCode;
use sync::{SignaturePolicy, SyncOptions, sync_manifests};
use targets::{InvalidTarget, TargetSelector};
use tracing::{Event, Level, Subscriber, error, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

struct SyncExitCode;

impl SyncExitCode {
    /// Exit code used when `--target` is missing or not a known target.
    fn invalid_target() -> ExitCode {
        ExitCode::from(1)
    }

    /// Exit code used for other errors (I/O errors, invalid JSON, etc.).
    fn any_error() -> ExitCode {
        ExitCode::from(255)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_level);

    let selector = match cli.target.as_deref().map(str::parse::<TargetSelector>) {
        Some(Ok(selector)) => selector,
        Some(Err(err)) => {
            error!("{err}");
            return SyncExitCode::invalid_target();
        }
        None => {
            error!("{InvalidTarget}");
            return SyncExitCode::invalid_target();
        }
    };

    // Change working directory if -C was specified
    if let Some(directory) = &cli.directory
        && let Err(e) = std::env::set_current_dir(directory)
    {
        error!(
            "Failed to change directory to {}: {}",
            directory.display(),
            e
        );
        return SyncExitCode::any_error();
    }

    match handle_sync(&cli, selector) {
        Ok(exit_code) => exit_code,
        Err(err) => {
            error!("{err}");
            SyncExitCode::any_error()
        }
    }
}

fn handle_sync(cli: &Cli, selector: TargetSelector) -> anyhow::Result<ExitCode> {
    let root = Path::new(".");

    let config = SyncConfig::discover(root, cli.config.as_deref())?;

    let options = SyncOptions {
        selector,
        version: cli.release_version(),
        notes: cli.release_notes(),
        signature_policy: if cli.signature {
            SignaturePolicy::Required
        } else {
            SignaturePolicy::Lenient
        },
        dry_run: cli.dry_run,
    };

    let mut out = stdout().lock();
    let result = sync_manifests(root, &config, &options, chrono::Utc::now(), &mut out)?;
    std::io::Write::flush(&mut out).context("Failed to flush stdout")?;

    if options.dry_run {
        info!("DRY RUN - no files were modified");
    }

    let signed = result
        .targets
        .iter()
        .filter(|t| t.signature.is_some())
        .count();
    info!(
        "Updated {} manifest(s), {} with a new signature",
        result.targets.len(),
        signed
    );
    for outcome in &result.targets {
        info!("  {}: {}", outcome.target, outcome.manifest.display());
    }

    if !result.metadata_updated.is_empty() {
        info!("Updated {} metadata files:", result.metadata_updated.len());
        for path in result.metadata_updated {
            info!("  {}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Picks the log filter: `--log-level`, then `-v`, then `RUST_LOG`, then `warn`.
fn log_filter(verbose: u8, log_level: Option<LogLevel>) -> Option<&'static str> {
    match (log_level, verbose) {
        (Some(level), _) => Some(level.as_filter()),
        (None, 0) => None,
        (None, 1) => Some("info"),
        (None, _) => Some("debug"),
    }
}

fn init_tracing(verbose: u8, log_level: Option<LogLevel>) {
    let stderr_is_terminal = stderr().is_terminal();
    let formatter = EmojiFormatter { stderr_is_terminal };

    let filter = match log_filter(verbose, log_level) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let fmt_layer = tracing_fmt::layer()
        .event_format(formatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

struct EmojiFormatter {
    stderr_is_terminal: bool,
}

impl<S, N> FormatEvent<S, N> for EmojiFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        if self.stderr_is_terminal {
            match *event.metadata().level() {
                Level::DEBUG => write!(writer, "🔍 ")?,
                Level::INFO => write!(writer, "ℹ️ ")?,
                Level::WARN => write!(writer, "⚠️  ")?,
                Level::ERROR => write!(writer, "❌️ ")?,
                _ => {}
            }
        } else {
            match *event.metadata().level() {
                Level::DEBUG => writer.write_str("DEBUG: ")?,
                Level::INFO => writer.write_str("INFO: ")?,
                Level::WARN => writer.write_str("WARN: ")?,
                Level::ERROR => writer.write_str("ERROR: ")?,
                _ => {}
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
