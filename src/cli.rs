use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "histmap")]
#[command(about = "Cleaning, deduplication, and slug tooling for a historical-events map dataset")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without writing any file
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collapse duplicate event records, keeping the best of each group
    Dedupe(DedupeArgs),

    /// Generate URL slugs and check them for collisions
    Slugs(SlugsArgs),

    /// Validate the dataset against the closed schema
    Validate(ValidateArgs),

    /// Summarize category counts and field completeness
    Stats(StatsArgs),

    /// Initialize a histmap.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct DedupeArgs {
    /// Dataset file (defaults to the configured path)
    pub input: Option<PathBuf>,

    /// Write surviving records here instead of back to the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print per-record score breakdowns for every merged group
    #[arg(long)]
    pub explain: bool,

    /// Emit a machine-readable JSON report (single line)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct SlugsArgs {
    /// Dataset file (defaults to the configured path)
    pub input: Option<PathBuf>,

    /// Write an id -> slug JSON map here
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exit nonzero if any two records share a slug
    #[arg(long)]
    pub check: bool,

    /// Emit a machine-readable JSON report (single line)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Dataset file (defaults to the configured path)
    pub input: Option<PathBuf>,

    /// Apply the legacy category remap and write the corrected dataset
    #[arg(long)]
    pub fix: bool,

    /// Write the corrected dataset here instead of back to the input
    #[arg(short, long, requires = "fix")]
    pub output: Option<PathBuf>,

    /// Emit a machine-readable JSON report (single line)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Dataset file (defaults to the configured path)
    pub input: Option<PathBuf>,

    /// Emit a machine-readable JSON report (single line)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
