//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dermlint: batch metadata validation for skin-image archive uploads
#[derive(Parser)]
#[command(name = "dermlint")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a metadata CSV against a cohort's stored accessions
    Check {
        /// Path to the metadata file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to the accession snapshot (JSON, cohort name -> records)
        #[arg(short, long, value_name = "SNAPSHOT")]
        records: PathBuf,

        /// Cohort the upload belongs to
        #[arg(short, long)]
        cohort: String,

        /// Emit the full report as JSON instead of the human summary
        #[arg(long)]
        json: bool,
    },

    /// Show a file's columns and which identifier column applies
    Columns {
        /// Path to the metadata file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}
