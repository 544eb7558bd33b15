use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, Context, Result};
use crate::fetch::{Interval, OutputSize};

use super::{validator, Config};

pub const DEFAULT_CONFIG_FILE: &str = "intraday-dash.json";

/// Load configuration from `path`, or from `intraday-dash.json` when no path is
/// given. Only an explicitly requested file is required to exist.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let requested = path.is_some();
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

    let mut last_error = None;
    for candidate in search_paths(path) {
        match std::fs::read_to_string(&candidate) {
            Ok(content) => {
                log::debug!("Loading configuration from {}", candidate.display());
                let config = parse_config(&content).with_context(|| {
                    format!("failed to load configuration from {}", candidate.display())
                })?;
                return Ok(config);
            }
            Err(e) => {
                last_error = Some(format!("Failed to read {}: {}", candidate.display(), e));
            }
        }
    }

    if requested {
        return Err(AppError::message(format!(
            "Could not find config file. Last error: {}",
            last_error.unwrap_or_else(|| "No search paths".to_string())
        )));
    }

    Ok(Config::builtin())
}

/// Apply a JSON override document on top of the built-in configuration.
pub fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = serde_json::from_str(content)?;
    let config = raw.into_config()?;
    validator::validate_config(&config)?;
    Ok(config)
}

fn search_paths(path: &Path) -> Vec<PathBuf> {
    if path.is_absolute() {
        return vec![path.to_path_buf()];
    }

    let mut paths = vec![path.to_path_buf()];
    if let Some(beside_exe) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join(path)))
    {
        paths.push(beside_exe);
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(path));
    }
    paths.dedup();
    paths
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    api_key_env: Option<String>,
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default)]
    interval: Option<String>,
    #[serde(default)]
    output_size: Option<String>,
}

impl RawConfig {
    fn into_config(self) -> Result<Config> {
        let mut config = Config::builtin();

        if let Some(endpoint) = self.endpoint {
            config.provider.endpoint = endpoint.trim().to_string();
        }
        if let Some(env) = self.api_key_env {
            config.provider.api_key_env = env.trim().to_string();
        }
        if let Some(agent) = self.user_agent {
            config.provider.user_agent = agent;
        }
        if let Some(interval) = self.interval {
            config.defaults.interval = interval.parse::<Interval>()?;
        }
        if let Some(size) = self.output_size {
            config.defaults.output_size = size.parse::<OutputSize>()?;
        }

        Ok(config)
    }
}
