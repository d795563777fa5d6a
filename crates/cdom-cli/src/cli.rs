use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::commands::Commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "cdom",
    author,
    version,
    about = "Binding resolver for C and C++ syntax trees",
    long_about = "cdom reads syntax trees exported as *.ast.json, resolves every name to the\n\
                  declaration it denotes and reports the problems it finds.\n\n\
                  Configure logging with --log-level and --log-file options, or set CDOM_LOG\n\
                  to filter directives such as cdom_core::semantic=trace."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, value_enum, default_value = "warn", global = true, help = "Set the log level")]
    pub log_level: LogLevel,

    #[arg(long, global = true, help = "Write logs to the specified file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub log_json: bool,
}
