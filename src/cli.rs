//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use docsift_index::models::Category;

/// Inspect, validate and search generated documentation search indices.
#[derive(Parser, Debug)]
#[command(name = "docsift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// More logging; repeat for more detail (RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Validate an index; exits with 1 if any record is unusable
    Check {
        /// Index file, or `-` for stdin
        file: Option<PathBuf>,
    },
    /// Rank records matching every term
    Search {
        /// `[FILE] TERMS...`: the first word is read as the index when it is
        /// `-` or an existing file and more words follow
        #[arg(required = true, num_args = 1.., value_name = "TERMS")]
        words: Vec<String>,
        /// Only records of this category (repeatable)
        #[arg(short, long = "category", value_parser = parse_category)]
        categories: Vec<Category>,
        /// Only records on this page
        #[arg(short, long)]
        page: Option<String>,
        /// Maximum number of hits
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print one record exactly as loaded
    #[command(allow_missing_positional = true)]
    Show {
        /// Index file, or `-` for stdin
        file: Option<PathBuf>,
        /// Zero-based record position
        position: usize,
    },
    /// List pages with their record counts
    Pages {
        /// Index file, or `-` for stdin
        file: Option<PathBuf>,
    },
    /// Print summary counts
    Stats {
        /// Index file, or `-` for stdin
        file: Option<PathBuf>,
    },
    /// Re-serialize an index
    Export {
        /// Index file, or `-` for stdin
        file: Option<PathBuf>,
        /// Output encoding
        #[arg(long = "as", value_enum, default_value_t = ExportFormat::Js)]
        encoding: ExportFormat,
        /// Write here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Compare two indices; exits with 1 if they differ
    Diff {
        /// Baseline index
        old: PathBuf,
        /// Index to compare against the baseline
        new: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// JSON document
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// JavaScript assignment, as the documentation generator writes it
    #[default]
    Js,
    /// Bare `{"docs": [...]}` object
    Json,
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse().map_err(|_| {
        let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        format!("unknown category '{value}', expected one of: {}", names.join(", "))
    })
}
