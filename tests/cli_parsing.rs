//! Tests for CLI parsing.

use bullet_trains::{Config, LogFormat, LogLevel, OutputFormat};
use clap::Parser;

#[test]
fn test_cli_defaults() {
    let config = Config::try_parse_from(["bullet_trains", "-u", "admin", "-p", "secret"])
        .expect("Should parse with defaults");

    assert_eq!(config.db, "bullet_trains");
    assert_eq!(config.collection, "chicago_to_florida");
    assert_eq!(config.count, 10);
    assert!(!config.batch);
    assert_eq!(config.output_format, OutputFormat::Table);
    assert_eq!(config.username.as_deref(), Some("admin"));
    assert_eq!(config.password.as_deref(), Some("secret"));
    assert_eq!(
        log::LevelFilter::from(config.log_level.clone()),
        log::LevelFilter::from(LogLevel::Info)
    );
    match config.log_format {
        LogFormat::Plain => {}
        _ => panic!("Should be Plain format"),
    }
}

#[test]
fn test_cli_with_options() {
    let args = [
        "bullet_trains",
        "--uri",
        "memory://",
        "--db",
        "rail",
        "--collection",
        "boston_to_dc",
        "--count",
        "25",
        "--batch",
        "--set-capacity",
        "300",
        "--output-format",
        "jsonl",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ];
    let config = Config::try_parse_from(args).expect("Should parse options");

    assert_eq!(config.uri, "memory://");
    assert_eq!(config.db, "rail");
    assert_eq!(config.collection, "boston_to_dc");
    assert_eq!(config.count, 25);
    assert!(config.batch);
    assert_eq!(config.set_capacity, Some(300));
    assert_eq!(config.output_format, OutputFormat::Jsonl);
    assert_eq!(
        log::LevelFilter::from(config.log_level.clone()),
        log::LevelFilter::Debug
    );
    assert!(matches!(config.log_format, LogFormat::Json));
}

#[test]
fn test_cli_rejects_negative_count() {
    let result = Config::try_parse_from(["bullet_trains", "--count", "-3"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_unknown_output_format() {
    let result = Config::try_parse_from(["bullet_trains", "--output-format", "xml"]);
    assert!(result.is_err());
}
