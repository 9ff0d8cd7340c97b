//! sysfixctl - diagnose this host and apply safe fixes

use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use sysfixctl::cli::{Cli, Commands};
use sysfixctl::commands;
use sysfixctl::errors::EXIT_GENERAL_ERROR;
use sysfixctl::logging;

fn main() {
    let cli = Cli::parse();

    let init = matches!(cli.command, Commands::Config { init: true });
    let config = match commands::load_config(cli.config.as_deref(), init) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "[ERROR]".bright_red(), e);
            process::exit(EXIT_GENERAL_ERROR);
        }
    };
    logging::init(cli.verbose, &config.log.level);

    match commands::run(&cli, &config) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "[ERROR]".bright_red(), e);
            process::exit(EXIT_GENERAL_ERROR);
        }
    }
}
