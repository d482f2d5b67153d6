use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BENCH-SCORE: difficulty-weighted scoring for LLM benchmark runs
///
/// Reads the raw results of a benchmark run, weights every assertion by the
/// difficulty of its test and writes a per-model report.
#[derive(Parser, Debug)]
#[command(name = "bench-score")]
#[command(version = "0.1.0")]
#[command(about = "Score LLM benchmark results by test difficulty")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a results file and write the report
    Score(ScoreArgs),

    /// Generate a sample config file
    Init(InitArgs),

    /// Print a saved report as Markdown
    Show(ShowArgs),
}

#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Path to the raw results file (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to the config file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run start time (RFC 3339), defaults to the results timestamp
    #[arg(long)]
    pub started_at: Option<String>,

    /// Run end time (RFC 3339), defaults to now
    #[arg(long)]
    pub ended_at: Option<String>,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Dry run - score and print the summary without writing a report
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for the config file
    #[arg(short, long, default_value = "bench-score.yaml")]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Report file written by `score`
    pub report: PathBuf,

    /// Path to the config file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
