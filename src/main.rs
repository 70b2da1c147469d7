use anyhow::Result;
use clap::Parser;
use histmap::cli::{AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // RUST_LOG-controlled diagnostics on stderr; silent by default
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Dedupe(args) => histmap::dedupe_run(args, &ctx),
        Commands::Slugs(args) => histmap::slugs_run(args, &ctx),
        Commands::Validate(args) => histmap::validate_run(args, &ctx),
        Commands::Stats(args) => histmap::stats_run(args, &ctx),
        Commands::Init(args) => histmap::infra::config::init(args, &ctx),
        Commands::Completions(args) => histmap::completion::run(args),
    }
}
