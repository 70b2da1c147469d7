use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::score::ScoreConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config
{
    /// Default dataset path used when a command gets no input argument
    pub dataset: PathBuf,

    /// Scoring thresholds and id-suffix lists
    pub score: ScoreConfig,

    /// Slug settings
    pub slug: SlugConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlugConfig
{
    /// Treat slug collisions as failures in `slugs --check`
    pub enforce_unique: bool,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            dataset: PathBuf::from("events.json"),
            score: ScoreConfig::default(),
            slug: SlugConfig { enforce_unique: true },
        }
    }
}

pub fn load_config() -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["histmap.toml", "histmap.yaml", "histmap.json", ".histmap.toml"];

    for path in &config_paths
    {
        if Path::new(path).exists()
        {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Add environment variables with HISTMAP_ prefix
    builder = builder.add_source(config::Environment::with_prefix("HISTMAP").separator("_"));

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("histmap.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
