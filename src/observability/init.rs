//! Tracing initialization.
//!
//! Sets up the `tracing` subscriber for the whole process: an `EnvFilter`
//! built from the configured trace level and a `fmt` layer writing either to
//! stderr (default) or to a rotating log file when a log directory is
//! configured. Observability is optional: initialization never fails the
//! caller, and a log directory that cannot be created falls back to stderr.

use super::file_writer::RotatingLogWriter;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the configured log directory.
const LOG_FILE_NAME: &str = "meridian.log";

/// Initializes the tracing subscriber from configuration.
///
/// Level resolution: `config.trace_level` if set, otherwise `"info"`.
/// Idempotent: only the first call in a process takes effect.
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::new(level);

    let file_writer = config.log_dir.as_ref().and_then(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("meridian: cannot create log directory {}: {e}", dir.display());
            return None;
        }
        Some(RotatingLogWriter::new(dir.join(LOG_FILE_NAME)))
    });

    if let Some(writer) = file_writer {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(false).with_writer(writer));
        let _ = subscriber.try_init();
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    }
}
