//! Tests for CLI argument parsing, config overlay and settings resolution

mod config_tests;
