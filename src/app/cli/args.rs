//! Core CLI arguments structure
//!
//! Every option that can also come from the config file is an `Option` (or a
//! `false`-by-default flag) so the overlay can tell "not given on the command
//! line" apart from an explicit value. Defaults are applied afterwards, in
//! `parsing.rs`.

use crate::core::logging::LogFormat;
use crate::core::validation::{
    validate_batch_label, validate_batch_targets, validate_positive_int, validate_query,
};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "repofuncs")]
#[command(about = "Scan the top-starred GitHub repositories for function definitions")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// GitHub search query [default: stars:>1]
    #[arg(short = 'Q', long = "query", value_name = "QUERY", value_parser = validate_query)]
    pub query: Option<String>,

    /// Number of top repositories to scan, 1-1000 [default: 100]
    #[arg(short = 't', long = "top", value_name = "N", value_parser = validate_positive_int)]
    pub top: Option<usize>,

    /// GitHub API token
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Skip files larger than this many KiB [default: 128]
    #[arg(short = 'k', long = "max-file-kb", value_name = "KB", value_parser = validate_positive_int)]
    pub max_file_kb: Option<usize>,

    /// Concurrent repository scans [default: 12]
    #[arg(short = 'w', long = "workers", value_name = "N", value_parser = validate_positive_int)]
    pub workers: Option<usize>,

    /// Repositories per batch [default: 25]
    #[arg(short = 'b', long = "chunk-size", value_name = "N", value_parser = validate_positive_int)]
    pub chunk_size: Option<usize>,

    /// Cumulative batch checkpoints, e.g. 10,20,25 (overrides --chunk-size)
    #[arg(long = "batch-targets", value_name = "LIST", value_parser = validate_batch_targets)]
    pub batch_targets: Option<String>,

    /// Print each function's source after its header line
    #[arg(long = "show-body")]
    pub show_body: bool,

    /// Never print function bodies (wins over --show-body)
    #[arg(long = "no-body")]
    pub no_body: bool,

    /// Staging directory for downloaded archives
    #[arg(short = 'd', long = "workdir", value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Keep downloaded archives after scanning
    #[arg(long = "keep-archives")]
    pub keep_archives: bool,

    /// Run each batch in its own child process
    #[arg(long = "parallel-processes")]
    pub parallel_processes: bool,

    #[arg(long = "subset-start", hide = true, value_parser = validate_positive_int)]
    pub subset_start: Option<usize>,

    #[arg(long = "subset-end", hide = true, value_parser = validate_positive_int)]
    pub subset_end: Option<usize>,

    #[arg(long = "batch-label", hide = true, value_parser = validate_batch_label)]
    pub batch_label: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level [default: warn]
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format [default: text]
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log file path (logs go to stderr when unset)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// More diagnostics (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Fewer diagnostics (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Force colored output
    #[arg(short = 'g', long = "color", overrides_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(short = 'n', long = "no-color", overrides_with = "color")]
    pub no_color: bool,
}

impl Args {
    /// Color preference from flags: `Some(true)`, `Some(false)` or auto
    pub fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
