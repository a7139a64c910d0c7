//! Host capabilities the engine is built on
//!
//! The reconciler only talks to these traits, so the real salt-cloud
//! backend and in-memory test doubles are interchangeable.

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Captured result of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs external programs to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Reports whether the cloud already knows an instance
#[async_trait]
pub trait InstanceExistenceChecker: Send + Sync {
    async fn has_instance(&self, name: &str) -> Result<bool>;
}

/// Parameters for provisioning one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNodeRequest {
    pub name: String,
    pub profile: String,
    /// SSH user when the profile does not set one
    pub user: String,
    pub roster: PathBuf,
    pub sudo: bool,
}

/// Provision and deprovision single nodes
///
/// Both operations return a human readable success message. Every failure,
/// whether the tool could not run or it reported something unexpected, is an
/// `Err`.
#[async_trait]
pub trait NodeLifecycle: Send + Sync {
    /// Create a cloud instance and add it to the roster
    async fn create_node(&self, request: &CreateNodeRequest) -> Result<String>;

    /// Destroy a cloud instance and remove it from the roster
    async fn destroy_node(&self, name: &str, roster: &Path) -> Result<String>;
}
