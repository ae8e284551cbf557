use crate::app::cli::args::Args;
use crate::app::cli::config::ConfigError;
use crate::core::error_handling::ContextualError;
use crate::core::logging::LogFormat;
use clap::Parser;
use std::path::PathBuf;
use tempfile::TempDir;

fn table(text: &str) -> toml::Table {
    toml::from_str(text).unwrap()
}

#[test]
fn test_config_fills_unset_options() {
    let mut args = Args::default();
    args.apply_toml_values(&table(
        r#"
        query = "language:go"
        top = 250
        max-file-kb = 32
        workers = 6
        chunk-size = 50
        batch-targets = [100, 200]
        show-body = true
        workdir = "/var/tmp/repofuncs"
        keep-archives = true
        log-level = "debug"
        log-format = "ext"
        "#,
    ))
    .unwrap();

    assert_eq!(args.query.as_deref(), Some("language:go"));
    assert_eq!(args.top, Some(250));
    assert_eq!(args.max_file_kb, Some(32));
    assert_eq!(args.workers, Some(6));
    assert_eq!(args.chunk_size, Some(50));
    assert_eq!(args.batch_targets.as_deref(), Some("100,200"));
    assert!(args.show_body);
    assert_eq!(args.workdir, Some(PathBuf::from("/var/tmp/repofuncs")));
    assert!(args.keep_archives);
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format, Some(LogFormat::Ext));
}

#[test]
fn test_command_line_wins_over_config() {
    let mut args =
        Args::try_parse_from(["repofuncs", "--top", "10", "--no-color", "--log-level", "info"]).unwrap();
    args.apply_toml_values(&table("top = 500\ncolor = true\nlog-level = \"trace\"\n"))
        .unwrap();

    assert_eq!(args.top, Some(10));
    assert_eq!(args.color_choice(), Some(false));
    assert_eq!(args.log_level.as_deref(), Some("info"));
}

#[test]
fn test_config_color_applies_when_unset() {
    let mut args = Args::default();
    args.apply_toml_values(&table("color = false\n")).unwrap();
    assert_eq!(args.color_choice(), Some(false));
}

#[test]
fn test_log_file_none_keeps_stderr() {
    let mut args = Args::default();
    args.apply_toml_values(&table("log-file = \"none\"\n")).unwrap();
    assert_eq!(args.log_file, None);
}

#[test]
fn test_invalid_config_values() {
    for text in [
        "workers = 0\n",
        "top = \"many\"\n",
        "show-body = \"yes\"\n",
        "batch-targets = \"1,x\"\n",
        "log-level = \"loud\"\n",
        "log-format = \"xml\"\n",
        "unknown-key = 1\n",
    ] {
        let err = Args::default().apply_toml_values(&table(text)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{}", text);
        assert!(err.is_user_actionable());
        assert!(err.user_message().is_some());
    }
}

#[tokio::test]
async fn test_load_explicit_config_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("repofuncs.toml");
    std::fs::write(&path, "top = 5\n").unwrap();

    let (loaded_path, table) = Args::load_config_file(Some(&path)).await.unwrap().unwrap();
    assert_eq!(loaded_path, path);
    assert_eq!(table.get("top").and_then(|v| v.as_integer()), Some(5));
}

#[tokio::test]
async fn test_missing_explicit_config_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");

    let err = Args::load_config_file(Some(&path)).await.unwrap_err();
    assert!(matches!(err, ConfigError::Missing { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[tokio::test]
async fn test_malformed_config_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    std::fs::write(&path, "top = = 5\n").unwrap();

    let err = Args::load_config_file(Some(&path)).await.unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(!err.is_user_actionable());
}
