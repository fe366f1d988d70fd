use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::error::{LinkageError, LinkageResult};
use crate::view::ViewState;

const APP_NAME: &str = "feature-linkage";
const CONFIG_FILE: &str = "config.json";

/// Output format of the CLI.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Tree,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Default output format for `feature` and `session` commands.
    pub output_format: OutputFormat,
    /// Port used by `serve` when none is given.
    pub port: u16,
    /// Persisted expand/collapse state of the rendered groups.
    pub expanded_groups: BTreeMap<String, bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            port: 17020,
            expanded_groups: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the user's config directory.
    /// Returns default config if file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let loaded = get_config_path().and_then(|path| Self::load_from(&path));
        match loaded {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> LinkageResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the current configuration to disk.
    pub fn save(&self) -> LinkageResult<()> {
        self.save_to(&get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> LinkageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn view_state(&self) -> ViewState {
        ViewState::from_overrides(self.expanded_groups.clone())
    }
}

fn get_config_path() -> LinkageResult<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| LinkageError::config("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
