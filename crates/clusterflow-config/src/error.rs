use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("Cloud profile '{profile}' not found in {dir}")]
    ProfileNotFound { profile: String, dir: PathBuf },

    #[error("Cloud profile '{0}' does not declare a provider")]
    ProviderUndeclared(String),

    #[error("Cloud provider '{provider}' (used by profile '{profile}') not found in {dir}")]
    ProviderNotFound {
        profile: String,
        provider: String,
        dir: PathBuf,
    },

    #[error("No driver configured for profile '{0}'")]
    DriverNotFound(String),

    #[error(
        "No credentials for profile '{0}'. Set one of password, ssh_key_file or private_key \
        on the profile or its provider"
    )]
    AuthNotFound(String),

    #[error("Invalid settings file {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
