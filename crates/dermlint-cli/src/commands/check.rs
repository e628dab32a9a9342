//! Check command - validate a metadata file against a cohort.

use std::path::PathBuf;

use colored::Colorize;
use dermlint::{Dermlint, InMemoryStore, ProblemKind, ValidationReport};

pub fn run(
    file: PathBuf,
    records: PathBuf,
    cohort: String,
    json: bool,
    verbose: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let store = InMemoryStore::from_snapshot_file(&records)?;
    if !store.cohort_names().any(|c| c == cohort) {
        eprintln!(
            "{} cohort '{}' not present in {}",
            "warning:".yellow().bold(),
            cohort,
            records.display()
        );
    }

    let report = Dermlint::new().check_file(&file, &store, &cohort)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(if report.has_errors() { 1 } else { 0 });
    }

    print_report(&file, &cohort, &report, verbose);
    Ok(if report.has_errors() { 1 } else { 0 })
}

fn print_report(file: &PathBuf, cohort: &str, report: &ValidationReport, verbose: bool) {
    println!(
        "{} {} against cohort {}",
        "Checked".cyan().bold(),
        file.display().to_string().white(),
        cohort.white()
    );

    if verbose {
        if let Some(ref source) = report.source {
            println!(
                "  {} rows, {} columns, {} ({})",
                source.row_count, source.column_count, source.format, source.hash
            );
        }
        if let Some(identifier) = report.identifier {
            println!("  keyed by {}", identifier.to_string().white());
        }
        println!();
    }

    for problem in &report.problems {
        let label = match problem.kind {
            ProblemKind::Error => problem.kind.label().red().bold(),
            ProblemKind::Warning => problem.kind.label().yellow().bold(),
        };
        println!("{}: {}", label, problem.message);
        if !problem.context.is_empty() {
            let values: Vec<String> = problem
                .context
                .iter()
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            println!("  {}", values.join(", ").dimmed());
        }
    }

    print_column_problems("Row problems", report.row_problems.iter());
    print_column_problems("Merged problems", report.merged_problems.iter());

    println!();
    if report.has_errors() {
        println!(
            "{} {} errors, {} warnings, {} distinct row failures across {} lines",
            "FAIL".red().bold(),
            report.summary.errors,
            report.summary.warnings,
            report.summary.standalone_failure_kinds + report.summary.merged_failure_kinds,
            report.summary.affected_lines
        );
    } else if report.summary.warnings > 0 {
        println!(
            "{} {} warnings to review",
            "OK".green().bold(),
            report.summary.warnings
        );
    } else {
        println!("{}", "OK - metadata looks clean!".green().bold());
    }
}

fn print_column_problems<'a>(
    heading: &str,
    entries: impl Iterator<Item = (&'a str, &'a str, &'a [usize])>,
) {
    let entries: Vec<_> = entries.collect();
    if entries.is_empty() {
        return;
    }

    println!();
    println!("{}", heading.yellow().bold());
    for (column, message, lines) in entries {
        println!(
            "  {} {} ({} rows: {})",
            column.white().bold(),
            message,
            lines.len(),
            format_lines(lines)
        );
    }
}

/// Show at most eight line numbers before eliding.
fn format_lines(lines: &[usize]) -> String {
    let shown: Vec<String> = lines.iter().take(8).map(|l| l.to_string()).collect();
    if lines.len() > 8 {
        format!("{}, ...", shown.join(", "))
    } else {
        shown.join(", ")
    }
}
