use noteindex_core::config::types::{LoggingConfig, ResolvedConfig};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Keeps the log file writer running. Buffered lines are flushed when this
/// is dropped, so commands hold it until they return.
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the stderr layer and, when configured, the log file layer.
///
/// Index runs append to the log file so it keeps a history of passes.
/// Exits if the log file can't be opened.
pub fn init(cfg: &ResolvedConfig) -> LogGuard {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_target(false)
        .without_time()
        .with_filter(env_filter(level_or(&cfg.logging.level, LevelFilter::INFO)));

    let registry = tracing_subscriber::registry().with(stderr_layer);

    let Some(ref path) = cfg.logging.file else {
        registry.init();
        return LogGuard { _file: None };
    };

    let file = open_log_file(path).unwrap_or_else(|e| {
        eprintln!("Failed to open log file {}: {}", path.display(), e);
        std::process::exit(1);
    });
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter(file_level(&cfg.logging)));

    registry.with(file_layer).init();
    LogGuard { _file: Some(guard) }
}

fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder().with_default_directive(level.into()).from_env_lossy()
}

/// `file_level` if set, else `level`, else debug.
fn file_level(cfg: &LoggingConfig) -> LevelFilter {
    level_or(cfg.file_level.as_deref().unwrap_or(&cfg.level), LevelFilter::DEBUG)
}

fn level_or(s: &str, default: LevelFilter) -> LevelFilter {
    parse_level(s).unwrap_or(default)
}

/// Open `path` for appending, creating it and its directory as needed.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            io::Error::new(e.kind(), format!("can't create {}: {}", parent.display(), e))
        })?;
    }
    File::options().create(true).append(true).open(path)
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}
