//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Driver and transport targets that are too chatty at the crate's level.
/// SRV lookups for mongodb+srv URIs go through hickory.
pub const NOISY_MODULES: &[(&str, LevelFilter)] = &[
    ("mongodb", LevelFilter::Warn),
    ("rustls", LevelFilter::Warn),
    ("hickory_proto", LevelFilter::Error),
    ("hickory_resolver", LevelFilter::Warn),
];

/// Returns the `NOISY_MODULES` clamps that `rust_log` does not override.
///
/// A directive overrides a module when it names the module itself or one of
/// its submodules (`mongodb=debug`, `mongodb::cmap=trace`).
fn module_clamps(rust_log: Option<&str>) -> Vec<(&'static str, LevelFilter)> {
    // Anything after '/' is a message regex, not a directive
    let directives = rust_log
        .and_then(|spec| spec.split('/').next())
        .unwrap_or("");
    let named: Vec<&str> = directives
        .split(',')
        .filter_map(|directive| {
            let directive = directive.trim();
            let (name, _) = directive.split_once('=').unwrap_or((directive, ""));
            if name.is_empty() || name.parse::<LevelFilter>().is_ok() {
                None
            } else {
                Some(name)
            }
        })
        .collect();

    NOISY_MODULES
        .iter()
        .filter(|(module, _)| {
            !named.iter().any(|name| {
                *name == *module
                    || name
                        .strip_prefix(module)
                        .is_some_and(|rest| rest.starts_with("::"))
            })
        })
        .copied()
        .collect()
}

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colors and emojis) and JSON formats for structured logging.
///
/// `RUST_LOG` is read first and the provided `level` overrides its default
/// level and the `bullet_trains` target. Driver targets are clamped to
/// [`NOISY_MODULES`] levels unless `RUST_LOG` names them, so
/// `RUST_LOG=mongodb=debug` still works for driver-level debugging while
/// `--log-level` controls this crate.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Show every driver command alongside the demo output
/// RUST_LOG=mongodb=debug bullet_trains -u admin -p secret --log-level debug
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    let rust_log = std::env::var("RUST_LOG").ok();
    for (module, clamp) in module_clamps(rust_log.as_deref()) {
        builder.filter_module(module, clamp);
    }
    builder.filter_module("bullet_trains", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                let emoji = match level {
                    log::Level::Error => "❌",
                    log::Level::Warn => "⚠️",
                    log::Level::Info => "🚄",
                    log::Level::Debug => "🔍",
                    log::Level::Trace => "🔬",
                };

                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    emoji,
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init so a second initialization (tests) returns an error instead of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_initialization_is_an_error_not_a_panic() {
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);

        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }

    fn clamped(rust_log: Option<&str>) -> Vec<&'static str> {
        module_clamps(rust_log).into_iter().map(|(m, _)| m).collect()
    }

    #[test]
    fn test_all_noisy_modules_clamped_without_rust_log() {
        assert_eq!(
            clamped(None),
            vec!["mongodb", "rustls", "hickory_proto", "hickory_resolver"]
        );
        assert_eq!(clamped(Some("debug")).len(), NOISY_MODULES.len());
    }

    #[test]
    fn test_rust_log_directive_lifts_only_its_module() {
        assert_eq!(
            clamped(Some("mongodb=debug")),
            vec!["rustls", "hickory_proto", "hickory_resolver"]
        );
        assert_eq!(
            clamped(Some("info, mongodb::cmap=trace,rustls")),
            vec!["hickory_proto", "hickory_resolver"]
        );
    }

    #[test]
    fn test_similar_prefix_does_not_lift_clamp() {
        // "mongodbx" is a different crate, and the regex part is not a directive
        assert_eq!(clamped(Some("mongodbx=debug/mongodb")).len(), NOISY_MODULES.len());
    }
}
