//! CLI argument parsing for the cards binary

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cards")]
#[command(author, version, about = "Query a self-refreshing card catalog", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Override the catalog endpoint
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the catalog, e.g. `cards query c:wu t:instant`
    Query {
        /// Query tokens (o:, t:, c:, c! prefixes; anything else matches the name)
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum results to print
        #[arg(short = 'n', long, default_value_t = crate::render::MAX_RESULTS)]
        limit: usize,
    },

    /// Look up one card by name, ignoring case and punctuation
    Lookup {
        /// Card name, e.g. "beck & call"
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Keep refreshing and report each new catalog until interrupted
    Watch,
}
