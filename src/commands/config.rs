use anyhow::{Context, Result};
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn handle_config_action(action: ConfigAction, config_path: Option<&Path>, json_output: bool) -> Result<()> {
    let path = resolve_path(config_path)?;

    match action {
        ConfigAction::Init => {
            Config::default().save_to(&path)?;
            if json_output {
                println!("{}", json!({
                    "status": "success",
                    "message": "Configuration initialized successfully",
                    "path": path.display().to_string(),
                }));
            } else {
                println!("Configuration initialized at: {}", path.display());
            }
        }
        ConfigAction::Show => {
            let config = Config::load(Some(&path))?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&config)
                    .context("Failed to serialize config to JSON")?);
            } else {
                let toml_str = toml::to_string_pretty(&config)
                    .context("Failed to serialize config")?;
                println!("Configuration ({})", path.display());
                println!("{}", toml_str);
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(Some(&path))?;
            config.set_value(&key, &value)
                .context("Invalid configuration")?;
            config.save_to(&path)?;
            if json_output {
                println!("{}", json!({
                    "status": "success",
                    "message": format!("Configuration updated: {key} = {value}"),
                }));
            } else {
                println!("Configuration updated: {} = {}", key, value);
            }
        }
    }

    Ok(())
}

fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path(),
    }
}
