//! Command-line definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sysfixctl")]
#[command(about = "Safe Linux diagnostics with optional AI-assisted fixes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Verbose logging (debug level)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run system diagnostics
    Check {
        /// Remediate the detected issues after listing them
        #[arg(long)]
        fix: bool,

        /// Ask the AI advisor about every issue, not only unrecognized ones
        #[arg(long)]
        ai: bool,

        /// Show what would be done without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a fix for one issue, by its number in `check` output
    Fix {
        /// Issue number (1-based)
        issue_number: usize,

        /// Ask the AI advisor about this issue
        #[arg(long)]
        ai: bool,

        /// Show what would be done without changing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that the AI advisor backend is reachable
    Advisor,

    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}
