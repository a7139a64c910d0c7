//! Cluster engine error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while provisioning or deprovisioning a node
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Configuration not found: {0}")]
    ConfigNotFound(#[from] clusterflow_config::ConfigError),

    #[error("Could not read json from salt-cloud: {message}\n{stderr}")]
    ExternalToolOutput { message: String, stderr: String },

    #[error("salt-cloud printed no json document\n{stderr}")]
    EmptyToolOutput { stderr: String },

    #[error("Failed to create node {name} from profile {profile}: no public address reported\n{stderr}")]
    AddressNotFound {
        name: String,
        profile: String,
        stderr: String,
    },

    #[error("Failed to remove node {name}: destruction not confirmed\n{stderr}")]
    DestroyNotConfirmed { name: String, stderr: String },

    #[error("Roster error: {path}: {source}")]
    RosterIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Roster entry for {name} is malformed: {message}")]
    RosterFormat { name: String, message: String },

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
