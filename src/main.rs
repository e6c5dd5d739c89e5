use clap::Parser;
use std::io;
use std::process::ExitCode;

mod cli;
mod config;
mod error;
mod fs;
mod logging;
mod models;
mod store;
mod validation;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // Logging problems never stop the command itself
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let _logger = match logging::init_logging(level, &config.log_dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {:#}", e);
            None
        }
    };

    let mut stdout = io::stdout().lock();
    match cli::run(cli, &config, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
