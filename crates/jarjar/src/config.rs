use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_CONFIG_NAME: &str = "jarjar.toml";
const HOME_CONFIG_NAME: &str = ".jarjar.toml";

/// Default message, channel and webhook for a [`crate::Jarjar`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Defaults {
    pub message: Option<String>,
    pub channel: Option<String>,
    pub webhook: Option<String>,
}

impl Defaults {
    /// Fields set in `other` replace ours; unset fields keep our value.
    pub fn overlay(self, other: Defaults) -> Defaults {
        Defaults {
            message: other.message.or(self.message),
            channel: other.channel.or(self.channel),
            webhook: other.webhook.or(self.webhook),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub message: Option<String>,
    pub channel: Option<String>,
    pub webhook: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, Defaults>,
}

impl Config {
    /// Load configuration from an explicit path, or search upward from the
    /// current dir and then the home directory. Having no file at all is fine.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let path = match path_override {
            Some(p) => p,
            None => match find_upwards(DEFAULT_CONFIG_NAME).or_else(home_config) {
                Some(p) => p,
                None => {
                    tracing::debug!("no {DEFAULT_CONFIG_NAME} found, using empty configuration");
                    return Ok(Config::default());
                }
            },
        };

        tracing::debug!(path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Parsing TOML config {}", path.display()))?;
        Ok(cfg)
    }

    /// Top-level defaults, overlaid by the named profile when one is given.
    pub fn defaults(&self, profile: Option<&str>) -> Result<Defaults> {
        let base = Defaults {
            message: self.message.clone(),
            channel: self.channel.clone(),
            webhook: self.webhook.clone(),
        };
        match profile {
            None => Ok(base),
            Some(name) => {
                let prof = self
                    .profiles
                    .get(name)
                    .with_context(|| format!("Profile '{}' not found in config", name))?;
                Ok(base.overlay(prof.clone()))
            }
        }
    }
}

fn find_upwards(file_name: &str) -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(file_name);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

fn home_config() -> Option<PathBuf> {
    let candidate = dirs::home_dir()?.join(HOME_CONFIG_NAME);
    candidate.exists().then_some(candidate)
}
