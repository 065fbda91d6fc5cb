//! Tracing setup shared by `serve` and the client commands.
//!
//! Everything goes to stderr so `list` and `genres` output on stdout stays
//! pipeable. `ENABLE_FILE_LOGS` adds a daily-rolling file under `LOG_DIR`.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVER_LEVEL: &str = "info";
const CLIENT_LEVEL: &str = "warn";
const DEFAULT_LOG_DIR: &str = "./logs";

/// Keeps the file writer alive; drop it only on shutdown.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub dir: PathBuf,
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directive
    pub level: String,
    /// Show module targets; the service does, client commands keep lines short
    pub with_target: bool,
    pub file: Option<LogFile>,
}

impl LogSettings {
    pub fn from_env(is_server: bool) -> Self {
        Self::resolve(
            is_server,
            std::env::var("RUST_LOG").ok(),
            std::env::var("ENABLE_FILE_LOGS").ok().as_deref(),
            std::env::var("LOG_DIR").ok(),
        )
    }

    /// Client commands stay at `warn` unless `RUST_LOG` says otherwise.
    pub fn resolve(
        is_server: bool,
        rust_log: Option<String>,
        file_logs: Option<&str>,
        log_dir: Option<String>,
    ) -> Self {
        let default_level = if is_server { SERVER_LEVEL } else { CLIENT_LEVEL };
        let level = rust_log
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_level.to_string());

        let file = matches!(file_logs, Some("true" | "1")).then(|| LogFile {
            dir: PathBuf::from(log_dir.unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())),
            name: if is_server {
                "book-tracker-server.log"
            } else {
                "book-tracker.log"
            },
        });

        Self {
            level,
            with_target: is_server,
            file,
        }
    }
}

pub fn init_tracing(settings: &LogSettings) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&settings.level).unwrap_or_else(|_| EnvFilter::new(SERVER_LEVEL));
    let stderr_layer = fmt::layer()
        .with_target(settings.with_target)
        .with_writer(std::io::stderr);

    let file_writer = settings.file.as_ref().and_then(|file| {
        if let Err(err) = std::fs::create_dir_all(&file.dir) {
            eprintln!("failed to create log directory {}: {err}", file.dir.display());
            return None;
        }
        let appender = RollingFileAppender::new(Rotation::DAILY, &file.dir, file.name);
        Some(tracing_appender::non_blocking(appender))
    });

    match file_writer {
        Some((writer, guard)) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(FileLogGuard { _guard: guard })
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}
