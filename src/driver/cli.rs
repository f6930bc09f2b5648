//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::{Parser, Subcommand};

use crate::adapter::config::DEFAULT_CONFIG_PATH;
use crate::domain::entities::import_kind::ImportKind;

/// 講義カタログのCSVインポートCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "lecturesync")]
#[command(about = "Bulk-import lecture catalog CSV files with per-row results and history", long_about = None)]
pub struct Args {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Import a CSV file (accessibility, disciplines or lectures)
    Import {
        /// Import kind (accessibility | disciplines | lectures)
        #[arg(value_parser = parse_kind)]
        kind: ImportKind,

        /// CSV file to import
        file: String,

        /// User recorded in the import history
        #[arg(long)]
        actor: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the CSV template for an import kind
    Template {
        #[arg(value_parser = parse_kind)]
        kind: ImportKind,

        /// Output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show the import history, newest first
    History {
        /// Maximum number of entries
        #[arg(long)]
        limit: Option<usize>,

        /// Print the history as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_kind(value: &str) -> Result<ImportKind, String> {
    value.parse()
}
