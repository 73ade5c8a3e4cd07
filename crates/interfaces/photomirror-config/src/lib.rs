//! Central configuration constants and the optional settings file.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// SmugMug 1.2.2 JSON API.
pub const DEFAULT_ENDPOINT: &str = "https://api.smugmug.com/services/api/json/1.2.2/";

/// Mirror root when neither flag, env nor settings name one.
pub const DEFAULT_DIR: &str = ".";

pub const DEFAULT_DELETE: bool = true;

pub const ENV_API_KEY: &str = "APIKEY";
pub const ENV_EMAIL: &str = "EMAIL";
pub const ENV_PASSWORD: &str = "PASSWORD";
pub const ENV_DIR: &str = "DIR";
pub const ENV_DRY: &str = "DRY";
pub const ENV_DELETE: &str = "DELETE";
pub const ENV_ENDPOINT: &str = "PHOTOMIRROR_ENDPOINT";

const QUALIFIER: &str = "com";
const ORG: &str = "photomirror";
const APP: &str = "photomirror";

pub const SETTINGS_FILE: &str = "settings.json";

/// Values read from `settings.json`. Every field is optional; anything
/// given on the command line or in the environment wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub api_key: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub dir: Option<String>,
    pub delete: Option<bool>,
    pub endpoint: Option<String>,
}

impl Settings {
    /// `settings.json` in the platform config directory, if one can be determined.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from(QUALIFIER, ORG, APP).map(|d| d.config_dir().join(SETTINGS_FILE))
    }

    /// Read settings from `path`. A missing file yields empty settings; an
    /// unreadable or malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings {}", path.display()))?;
        Ok(settings)
    }

    /// Explicit path if given, otherwise the platform default location.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("Settings file {} does not exist", p.display());
                }
                Self::load_from(p)
            }
            None => match Self::default_path() {
                Some(p) => Self::load_from(&p),
                None => Ok(Self::default()),
            },
        }
    }
}
