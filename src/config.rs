use std::path::PathBuf;

use eyre::{Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::Language;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Language code, one of en, te, hi, ta, kn
    pub default_lang: Option<String>,
    /// Where the batch archive is written
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load config from ~/.config/ytzip/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn default_language(&self) -> Result<Option<Language>> {
        match self.default_lang.as_deref() {
            None => Ok(None),
            Some(code) => match Language::from_code(code) {
                Some(lang) => Ok(Some(lang)),
                None => bail!("unsupported default_lang {code:?} in {}", config_path().display()),
            },
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytzip")
        .join("config.toml")
}
