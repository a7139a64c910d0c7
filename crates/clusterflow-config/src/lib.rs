pub mod credential;
pub mod error;
pub mod store;

pub use credential::{Auth, Credential, CredentialResolver, Profile, Provider};
pub use error::*;
pub use store::{ConfigStore, DirConfigStore};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILES_DIR: &str = "/etc/salt/cloud.profiles.d";
pub const DEFAULT_PROVIDERS_DIR: &str = "/etc/salt/cloud.providers.d";
pub const DEFAULT_ROSTER: &str = "/etc/salt/cluster/roster";
pub const DEFAULT_SALT_CLOUD: &str = "salt-cloud";
pub const DEFAULT_USER: &str = "root";

const SETTINGS_ENV: &str = "CLUSTERFLOW_CONFIG";
const SETTINGS_FILE: &str = "clusterflow.yaml";

/// Engine settings
///
/// Every field has a default, so a settings file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory of cloud profile files
    pub profiles_dir: PathBuf,
    /// Directory of cloud provider files
    pub providers_dir: PathBuf,
    /// Roster file receiving one block per node
    pub roster: PathBuf,
    /// salt-cloud executable
    pub salt_cloud: String,
    /// SSH user when the profile does not set `ssh_username`
    pub user: String,
    /// Mark non-root roster users for sudo
    pub sudo: bool,
    /// Upper bound for a single salt-cloud invocation
    pub timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profiles_dir: PathBuf::from(DEFAULT_PROFILES_DIR),
            providers_dir: PathBuf::from(DEFAULT_PROVIDERS_DIR),
            roster: PathBuf::from(DEFAULT_ROSTER),
            salt_cloud: DEFAULT_SALT_CLOUD.to_string(),
            user: DEFAULT_USER.to_string(),
            sudo: false,
            timeout_secs: None,
        }
    }
}

impl Settings {
    /// Read settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Settings from the discovered settings file, or defaults when there is none
    pub fn load() -> Result<Self> {
        match find_settings_file()? {
            Some(path) => {
                tracing::debug!(settings = %path.display(), "Loading settings");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// clusterflow's config directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("clusterflow");

    Ok(config_dir)
}

/// Find the settings file
///
/// Search order:
/// 1. `CLUSTERFLOW_CONFIG` environment variable (direct path)
/// 2. `./clusterflow.yaml`
/// 3. `~/.config/clusterflow/config.yaml`
pub fn find_settings_file() -> Result<Option<PathBuf>> {
    if let Ok(config_path) = std::env::var(SETTINGS_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    let local = std::env::current_dir()?.join(SETTINGS_FILE);
    if local.exists() {
        return Ok(Some(local));
    }

    if let Ok(config_dir) = get_config_dir() {
        let global = config_dir.join("config.yaml");
        if global.exists() {
            return Ok(Some(global));
        }
    }

    Ok(None)
}
