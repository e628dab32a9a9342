//! Columns command - show a file's header and the applicable identifier.

use std::path::PathBuf;

use colored::Colorize;
use dermlint::{IdentifierColumn, Parser};

pub fn run(file: PathBuf) -> Result<i32, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (table, source) = Parser::new().parse_file(&file)?;

    println!(
        "{} {} ({}, {} rows)",
        "Columns of".cyan().bold(),
        file.display().to_string().white(),
        source.format,
        source.row_count
    );
    for header in &table.headers {
        println!("  {}", header);
    }

    println!();
    match IdentifierColumn::resolve(&table) {
        Ok(identifier) => {
            println!("Rows keyed by {}", identifier.to_string().green().bold());
            Ok(0)
        }
        Err(problem) => {
            println!("{}: {}", "Error".red().bold(), problem.message);
            Ok(1)
        }
    }
}
