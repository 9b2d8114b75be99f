mod help_text;

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Patch desktop auto-update manifests for a release
#[derive(Parser, Debug)]
#[command(
    name = "manifest-sync",
    about,
    long_about = help_text::ROOT_LONG_ABOUT
)]
pub struct Cli {
    /// Manifest(s) to update: linux, darwin, windows or all
    #[arg(long, value_name = "TARGET")]
    pub target: Option<String>,

    /// Release version (without the leading v); rewrites URLs and version fields
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,

    /// Release notes
    #[arg(long, value_name = "NOTES")]
    pub notes: Option<String>,

    /// Require the signature glob to match exactly one file
    #[arg(long)]
    pub signature: bool,

    /// Print the updated manifests without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Config file overriding the built-in target table [default: manifest-sync.toml if present]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Change to DIRECTORY before doing anything
    #[arg(short = 'C', value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). Takes precedence over RUST_LOG.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Set the log level explicitly. Takes precedence over RUST_LOG.
    #[arg(long, value_name = "LEVEL", conflicts_with = "verbose")]
    pub log_level: Option<LogLevel>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// `--version`, with an empty value treated as absent.
    pub fn release_version(&self) -> Option<String> {
        self.version.clone().filter(|v| !v.is_empty())
    }

    /// `--notes`, with an empty value treated as absent.
    pub fn release_notes(&self) -> Option<String> {
        self.notes.clone().filter(|n| !n.is_empty())
    }
}
