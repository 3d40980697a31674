//! Tracing initialization for Driftbox applications.
//! Builds a subscriber with EnvFilter, a compact stdout layer, and an
//! optional non-blocking file layer under the application log directory.
//!
//! Behavior:
//! - An explicit level wins; otherwise RUST_LOG is honored, defaulting to
//!   `info`.
//! - File logging appends to `log_dir()/driftbox.log`; failure to open the
//!   file degrades to stdout-only rather than aborting startup.

use anyhow::{Context, Result};
use chrono::Local;
use std::fmt as stdfmt;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

use crate::appdirs;

/// Log file name under [`appdirs::log_dir`].
pub const LOG_FILE_NAME: &str = "driftbox.log";

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

fn env_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(lvl) => EnvFilter::new(lvl),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Initialize tracing. Returns a guard when a file appender was created;
/// hold it until shutdown so buffered log lines are flushed.
pub fn init_tracing(level: Option<&str>, to_file: bool) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(level);
    let stdout_layer = tsfmt::layer()
        .with_timer(LocalHumanTime)
        .with_target(true)
        .compact();

    if to_file {
        match open_log_writer() {
            Ok((writer, guard)) => {
                let file_layer = tsfmt::layer()
                    .with_timer(LocalHumanTime)
                    .with_target(true)
                    .with_ansi(false)
                    .compact()
                    .with_writer(writer);
                registry()
                    .with(filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .init();
                return Ok(Some(guard));
            }
            Err(e) => {
                eprintln!("File logging disabled: {e:#}. Logs will continue on stdout.");
            }
        }
    }

    registry().with(filter).with(stdout_layer).init();
    Ok(None)
}

fn open_log_writer() -> Result<(NonBlocking, WorkerGuard)> {
    let dir = appdirs::log_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    Ok(tracing_appender::non_blocking(file))
}
