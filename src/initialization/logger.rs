//! Logger initialization.

use std::io::Write;

use colored::*;
use log::LevelFilter;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Initializes the logger with the given level and format.
///
/// `RUST_LOG` is read first and `level` then overrides it for this crate.
/// Chatty dependencies (rustls, the DNS resolver) are capped so that
/// `--debug` shows the client's own connection handling rather than
/// protocol internals.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already set.
///
/// # Examples
///
/// ```bash
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=pinoader=trace,rustls=debug pinoader https://pin.it/example
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("rustls", LevelFilter::Warn);
    builder.filter_module("trust_dns_resolver", LevelFilter::Warn);
    // Truncated UDP answers are retried internally; their warnings are noise.
    builder.filter_module("trust_dns_proto", LevelFilter::Error);
    builder.filter_module("pinoader", level);

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
                let (emoji, colored_level) = match level {
                    log::Level::Error => ("❌", level.to_string().red()),
                    log::Level::Warn => ("⚠️", level.to_string().yellow()),
                    log::Level::Info => ("✔️", level.to_string().green()),
                    log::Level::Debug => ("🔍", level.to_string().blue()),
                    log::Level::Trace => ("🔬", level.to_string().purple()),
                };

                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    emoji,
                    chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init so repeated initialization in tests reports an error instead of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}
