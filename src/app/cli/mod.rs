//! CLI module containing argument parsing, config overlay and settings resolution

pub mod args;
pub mod config;
pub mod parsing;

pub use args::Args;
pub use config::{ConfigError, ConfigResult};
pub use parsing::{RunSettings, Subset};

#[cfg(test)]
mod tests;
