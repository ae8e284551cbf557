//! Command line parsing and settings resolution
//!
//! Parses `Args` with help styles from the shared palette, then resolves the
//! merged CLI + config values into `RunSettings` with defaults applied.

use super::args::Args;
use super::config::{ConfigError, ConfigResult};
use crate::core::logging::LogFormat;
use crate::core::styles::palette_to_clap;
use crate::core::validation::validate_subset_range;
use crate::discovery::SEARCH_RESULT_CAP;
use crate::pipeline::DEFAULT_WORKERS;
use clap::{CommandFactory, FromArgMatches};
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

pub const DEFAULT_QUERY: &str = "stars:>1";
pub const DEFAULT_TOP: usize = 100;
pub const DEFAULT_MAX_FILE_KB: usize = 128;
pub const DEFAULT_CHUNK_SIZE: usize = 25;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Child-process batch: ranks `start..=end` labelled `label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset {
    pub start: usize,
    pub end: usize,
    pub label: Option<String>,
}

/// Fully resolved options for one run
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub query: String,
    pub top: usize,
    pub token: Option<String>,
    pub max_file_kb: u64,
    pub workers: usize,
    pub chunk_size: usize,
    pub batch_targets: Option<String>,
    pub show_body: bool,
    pub workdir: PathBuf,
    pub keep_archives: bool,
    pub parallel_processes: bool,
    pub subset: Option<Subset>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub color: bool,
}

impl Args {
    /// Parse the process arguments, styling help with the color palette
    pub fn parse_with_styles() -> Self {
        Self::parse_from_with_styles(std::env::args_os())
    }

    pub fn parse_from_with_styles<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let wants_color = !args.iter().any(|a| a == "--no-color" || a == "-n")
            && (args.iter().any(|a| a == "--color" || a == "-g") || std::io::stdout().is_terminal());

        let matches = Self::command()
            .styles(palette_to_clap(wants_color))
            .get_matches_from(args);
        match Self::from_arg_matches(&matches) {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Effective log level: explicit level, else `warn` shifted by `-v`/`-q`
    pub fn effective_log_level(&self) -> String {
        if let Some(level) = &self.log_level {
            return level.clone();
        }
        let base = LEVELS
            .iter()
            .position(|l| *l == DEFAULT_LOG_LEVEL)
            .unwrap_or(2) as i32;
        let index = (base + self.verbose as i32 - self.quiet as i32)
            .clamp(0, LEVELS.len() as i32 - 1);
        LEVELS[index as usize].to_string()
    }

    /// Resolve colors: flags, then TTY detection on stdout
    pub fn use_color(&self) -> bool {
        self.color_choice()
            .unwrap_or_else(|| std::io::stdout().is_terminal())
    }

    /// Apply defaults and cross-option checks
    pub fn into_settings(self) -> ConfigResult<RunSettings> {
        let subset = match (self.subset_start, self.subset_end) {
            (Some(start), Some(end)) => {
                validate_subset_range(start, end).map_err(ConfigError::invalid)?;
                Some(Subset {
                    start,
                    end,
                    label: self.batch_label.clone(),
                })
            }
            (None, None) => None,
            _ => {
                return Err(ConfigError::invalid(
                    "--subset-start and --subset-end must be given together",
                ))
            }
        };

        let workdir = match self.workdir.clone() {
            Some(dir) => dir,
            None => default_workdir(),
        };

        Ok(RunSettings {
            log_level: self.effective_log_level(),
            log_format: self.log_format.unwrap_or_default(),
            color: self.use_color(),
            query: self.query.unwrap_or_else(|| DEFAULT_QUERY.to_string()),
            top: self.top.unwrap_or(DEFAULT_TOP).clamp(1, SEARCH_RESULT_CAP),
            token: self.token.filter(|t| !t.trim().is_empty()),
            max_file_kb: self.max_file_kb.unwrap_or(DEFAULT_MAX_FILE_KB) as u64,
            workers: self.workers.unwrap_or(DEFAULT_WORKERS),
            chunk_size: self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            batch_targets: self.batch_targets,
            show_body: self.show_body && !self.no_body,
            workdir,
            keep_archives: self.keep_archives,
            parallel_processes: self.parallel_processes && subset.is_none(),
            subset,
        })
    }
}

/// `<cache_dir>/repofuncs`, or the temp dir when there is no cache dir
pub fn default_workdir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("repofuncs")
}

impl RunSettings {
    /// Options passed to every batch child, excluding the subset range
    ///
    /// The token travels through the environment instead of argv.
    pub fn child_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let mut push = |flag: &str, value: String| {
            args.push(flag.into());
            args.push(value.into());
        };
        push("--query", self.query.clone());
        push("--top", self.top.to_string());
        push("--max-file-kb", self.max_file_kb.to_string());
        push("--workers", self.workers.to_string());
        push("--chunk-size", self.chunk_size.to_string());
        push("--log-level", self.log_level.clone());
        push(
            "--log-format",
            match self.log_format {
                LogFormat::Text => "text",
                LogFormat::Ext => "ext",
                LogFormat::Json => "json",
            }
            .to_string(),
        );
        args.push("--workdir".into());
        args.push(self.workdir.clone().into_os_string());

        args.push(if self.show_body { "--show-body" } else { "--no-body" }.into());
        args.push(if self.color { "--color" } else { "--no-color" }.into());
        if self.keep_archives {
            args.push("--keep-archives".into());
        }
        args
    }
}
