//! Subscriber setup for the `cdom` binary.
//!
//! Resolver events come from the `cdom_core` target, command events from `cdom`. The
//! `--log-level` flag sets both; `CDOM_LOG` replaces the whole filter with its own directives.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    prelude::*,
};

use crate::cli::{Cli, LogLevel};

/// Environment variable holding filter directives that override `--log-level`.
pub const LOG_ENV: &str = "CDOM_LOG";

/// File name used when `--log-file` names a directory.
pub const DEFAULT_LOG_FILE: &str = "cdom.log";

const TARGETS: [&str; 2] = ["cdom_core", "cdom"];

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File { directory: PathBuf, file_name: String },
}

/// Installs the global subscriber. The returned guard flushes the log file when dropped.
pub fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let directives = filter_directives(cli.log_level, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(level_directives(cli.log_level)));

    let (writer, ansi, guard) = match log_target(cli.log_file.as_deref()) {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true, None),
        LogTarget::File {
            directory,
            file_name,
        } => {
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), false, Some(guard))
        }
    };

    let subscriber = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_ansi(ansi)
                    .with_target(!ansi)
                    .with_writer(writer)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    }

    guard
}

/// Filter directives for a run: the environment override when set, otherwise the level
/// applied to cdom's own targets and `warn` for everything else.
pub fn filter_directives(level: LogLevel, env: Option<String>) -> String {
    match env {
        Some(directives) if !directives.trim().is_empty() => directives,
        _ => level_directives(level),
    }
}

fn level_directives(level: LogLevel) -> String {
    let level = level.as_tracing_level().as_str().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Splits `--log-file` into the directory and file name the appender writes to.
pub fn log_target(log_file: Option<&Path>) -> LogTarget {
    let Some(path) = log_file else {
        return LogTarget::Stderr;
    };
    if path.is_dir() {
        return LogTarget::File {
            directory: path.to_path_buf(),
            file_name: DEFAULT_LOG_FILE.to_string(),
        };
    }
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_LOG_FILE)
        .to_string();
    LogTarget::File {
        directory,
        file_name,
    }
}
