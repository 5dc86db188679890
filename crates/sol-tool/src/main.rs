use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::debug;
use sol_tool::{init_logging, run, Cli, Settings};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli);
    init_logging(&settings);
    debug!("{settings:?}");

    match run(cli.command, &settings, io::stdin().lock()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
