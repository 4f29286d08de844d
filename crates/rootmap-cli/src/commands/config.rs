use crate::logger;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use rootmap_config::LoaderConfig;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the value of one key
    Get { key: String },
    /// Set one key in the config file
    Set { key: String, value: String },
    /// Print the config file location
    Path,
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> Result<()> {
    let config_path = LoaderConfig::path();
    logger::debug(&format!("Reading config from: {}", config_path.display()));

    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config =
                LoaderConfig::load_from_path(&config_path).context("Failed to load config")?;
            println!("{}", "Configuration:".bold().green());
            for (key, value) in config.values_iter() {
                println!("  {}: {}", key.cyan(), value);
            }
            if opts.verbosity_level() > 0 {
                println!("  {} {}", "file".dimmed(), config_path.display());
            }
        }
        ConfigAction::Get { key } => {
            let config =
                LoaderConfig::load_from_path(&config_path).context("Failed to load config")?;
            match config.get(&key) {
                Some(value) => println!("{}", value),
                None => anyhow::bail!("Unknown or unset config key '{}'", key),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config =
                LoaderConfig::load_from_path(&config_path).context("Failed to load config")?;
            config.set(&key, value.clone())?;
            config
                .save_to_path(&config_path)
                .context("Failed to save config")?;
            logger::success(&format!("Set {} = {}", key, value));
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}
