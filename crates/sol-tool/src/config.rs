//! Runtime settings and logger setup.
//!
//! Settings are resolved once from the parsed command line (which already
//! folds in the `SOLTX_*` environment variables) and passed down explicitly.

use clap::ValueEnum;

use crate::cli::Cli;

/// Filter used when neither `--log-level`, `SOLTX_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single-line JSON
    Json,
    /// Indented JSON
    Pretty,
    /// Plain text for humans
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output: OutputFormat,
    pub log_filter: String,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self::resolve(cli, std::env::var("RUST_LOG").ok())
    }

    fn resolve(cli: &Cli, rust_log: Option<String>) -> Self {
        let log_filter = cli
            .log_level
            .clone()
            .or(rust_log)
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            output: cli.output,
            log_filter,
        }
    }
}

/// Install `env_logger` on stderr so stdout stays machine-readable.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(settings: &Settings) {
    let _ = env_logger::Builder::new()
        .parse_filters(&settings.log_filter)
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .try_init();
}
