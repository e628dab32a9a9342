//! Dermlint CLI - batch metadata validation for archive uploads.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            file,
            records,
            cohort,
            json,
        } => commands::check::run(file, records, cohort, json, cli.verbose),

        Commands::Columns { file } => commands::columns::run(file),
    };

    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
