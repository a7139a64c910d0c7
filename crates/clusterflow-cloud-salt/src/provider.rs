//! salt-cloud backed node lifecycle

use crate::normalize::{Driver, extract_address};
use crate::salt_cloud::{ProcessRunner, SaltCloud, query_lists_node};
use async_trait::async_trait;
use clusterflow_cloud::{
    CloudError, CreateNodeRequest, FileEditor, InstanceExistenceChecker, LocalFiles,
    NodeLifecycle, Result, Roster, RosterEntry,
};
use clusterflow_config::{CredentialResolver, Settings};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Node lifecycle on top of salt-cloud
pub struct SaltCloudProvider {
    salt_cloud: SaltCloud,
    resolver: CredentialResolver,
    files: Arc<dyn FileEditor>,
}

impl SaltCloudProvider {
    pub fn new(salt_cloud: SaltCloud, resolver: CredentialResolver) -> Self {
        Self {
            salt_cloud,
            resolver,
            files: Arc::new(LocalFiles),
        }
    }

    /// Provider spawning the configured salt-cloud binary
    pub fn from_settings(settings: &Settings) -> Self {
        let runner = ProcessRunner::new(settings.timeout_secs.map(Duration::from_secs));
        Self::new(
            SaltCloud::new(&settings.salt_cloud, Arc::new(runner)),
            CredentialResolver::from_settings(settings),
        )
    }

    /// Use another file editor for roster updates
    pub fn with_files(mut self, files: Arc<dyn FileEditor>) -> Self {
        self.files = files;
        self
    }

    fn roster(&self, path: &Path) -> Roster {
        Roster::with_editor(path, self.files.clone())
    }
}

/// Whether a destroy response mentions the node
///
/// salt-cloud nests the destroyed name at different depths per driver, so
/// this only checks that the name shows up anywhere in a mapping response.
pub fn destroy_confirmed(payload: &Value, name: &str) -> bool {
    payload.is_object() && payload.to_string().contains(name)
}

fn with_preamble(preamble: &str, message: String) -> String {
    if preamble.trim().is_empty() {
        message
    } else {
        format!("{}\n{}", preamble, message)
    }
}

#[async_trait]
impl NodeLifecycle for SaltCloudProvider {
    async fn create_node(&self, request: &CreateNodeRequest) -> Result<String> {
        let credential = self.resolver.resolve(&request.profile)?;
        let user = credential
            .ssh_username
            .clone()
            .unwrap_or_else(|| request.user.clone());

        tracing::info!(node = %request.name, profile = %request.profile, "Creating node");
        let response = self.salt_cloud.create(&request.profile, &request.name).await?;

        let driver = Driver::from(credential.driver.as_str());
        let Some(host) = extract_address(&driver, &response.payload, &request.name) else {
            return Err(CloudError::AddressNotFound {
                name: request.name.clone(),
                profile: request.profile.clone(),
                stderr: response.stderr,
            });
        };

        let entry = RosterEntry::new(&request.name, &host, user, credential.auth, request.sudo);
        self.roster(&request.roster).upsert(&entry).await?;

        Ok(with_preamble(
            &response.preamble,
            format!(
                "Node {} created at {} and added to roster {}",
                request.name,
                host,
                request.roster.display()
            ),
        ))
    }

    async fn destroy_node(&self, name: &str, roster: &Path) -> Result<String> {
        tracing::info!(node = %name, "Destroying node");
        let response = self.salt_cloud.destroy(name).await?;

        if !destroy_confirmed(&response.payload, name) {
            return Err(CloudError::DestroyNotConfirmed {
                name: name.to_string(),
                stderr: response.stderr,
            });
        }

        self.roster(roster).remove(name).await?;

        Ok(with_preamble(
            &response.preamble,
            format!("Node {} destroyed and removed from roster {}", name, roster.display()),
        ))
    }
}

#[async_trait]
impl InstanceExistenceChecker for SaltCloudProvider {
    async fn has_instance(&self, name: &str) -> Result<bool> {
        let response = self.salt_cloud.query().await?;
        Ok(query_lists_node(&response.payload, name))
    }
}
