//! `soltx` internals: argument parsing, settings, subcommand dispatch and
//! output rendering on top of `sol_codec`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

pub use cli::{Cli, Command};
pub use commands::run;
pub use config::{init_logging, OutputFormat, Settings};
