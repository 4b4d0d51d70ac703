//! CLI type definitions
//!
//! This module contains the clap structures that define the CLI interface.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reprompt")]
#[command(about = "Reprompt - sample, judge, and reverse-engineer a better prompt", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Input prompt to optimize
    #[arg(short, long)]
    pub input: String,

    /// Number of responses to generate for comparison
    #[arg(short, long, allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Backend base URL (e.g. http://localhost:11434)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Load configuration from this YAML file instead of .reprompt/
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}
