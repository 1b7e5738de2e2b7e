//! Global venuecal configuration.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{VenueCalError, VenueCalResult};
use crate::store::JsonDirStore;

static DEFAULT_DATA_DIR: &str = "~/venuecal/events";

/// Starter file: every key present but commented out.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# venuecal configuration
# Any key can also be set as VENUECAL_<KEY>, e.g. VENUECAL_DATA_DIR.

# data_dir = "~/venuecal/events"
# export_path = "~/venuecal/events.json"
"#;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

/// Global configuration at ~/.config/venuecal/config.toml
///
/// Every key can be overridden from the environment with a `VENUECAL_`
/// prefix, e.g. `VENUECAL_DATA_DIR`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VenuecalConfig {
    /// Directory holding one JSON record per date
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Default target for `venuecal export`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_path: Option<PathBuf>,
}

impl Default for VenuecalConfig {
    fn default() -> Self {
        VenuecalConfig {
            data_dir: default_data_dir(),
            export_path: None,
        }
    }
}

impl VenuecalConfig {
    pub fn config_path() -> VenueCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| VenueCalError::Config("Could not determine config directory".into()))?
            .join("venuecal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented default on first use.
    pub fn load() -> VenueCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit file, layered with `VENUECAL_*` variables.
    pub fn load_from(path: &Path) -> VenueCalResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("VENUECAL"))
            .build()
            .map_err(|e| VenueCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| VenueCalError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn export_path(&self) -> Option<PathBuf> {
        self.export_path.as_deref().map(expand)
    }

    pub fn store(&self) -> JsonDirStore {
        JsonDirStore::new(self.data_path())
    }

    /// Write the commented-out starter config to `path`.
    pub fn create_default_config(path: &Path) -> VenueCalResult<()> {
        let fail = |action: &str, e: std::io::Error| {
            VenueCalError::Config(format!("Could not {action} {}: {e}", path.display()))
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| fail("create directory for", e))?;
        }
        std::fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(|e| fail("write", e))
    }

    /// Serialize the effective config, e.g. for `venuecal config`.
    pub fn to_toml(&self) -> VenueCalResult<String> {
        toml::to_string_pretty(self).map_err(|e| VenueCalError::Config(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
