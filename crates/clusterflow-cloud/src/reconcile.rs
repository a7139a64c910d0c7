//! Convergence of declared nodes against the cloud
//!
//! Nodes are handled one after another in declaration order. A failing node
//! is recorded and the remaining nodes are still processed.

use crate::cluster::ProfileNodes;
use crate::provider::{CreateNodeRequest, InstanceExistenceChecker, NodeLifecycle};
use crate::result::{ClusterAction, ClusterResult, NodeResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Run-wide options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Report what would change without touching the cloud or the roster
    pub dry_run: bool,
    /// SSH user for nodes whose profile does not set one
    pub user: String,
    pub roster: PathBuf,
    pub sudo: bool,
}

pub struct Reconciler {
    lifecycle: Arc<dyn NodeLifecycle>,
    existence: Arc<dyn InstanceExistenceChecker>,
    options: ReconcileOptions,
}

impl Reconciler {
    pub fn new(
        lifecycle: Arc<dyn NodeLifecycle>,
        existence: Arc<dyn InstanceExistenceChecker>,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            lifecycle,
            existence,
            options,
        }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Make sure the node exists
    pub async fn node_present(&self, name: &str, profile: &str) -> NodeResult {
        match self.existence.has_instance(name).await {
            Ok(true) => {
                return NodeResult::unchanged(
                    name,
                    format!("Cluster node {} already present", name),
                );
            }
            Ok(false) => {}
            Err(e) => {
                warn!(node = %name, error = %e, "Existence check failed");
                return NodeResult::failed(name, e.to_string());
            }
        }

        if self.options.dry_run {
            return NodeResult::pending(name, format!("Cluster node {} is set to be created", name));
        }

        let request = CreateNodeRequest {
            name: name.to_string(),
            profile: profile.to_string(),
            user: self.options.user.clone(),
            roster: self.options.roster.clone(),
            sudo: self.options.sudo,
        };

        match self.lifecycle.create_node(&request).await {
            Ok(message) => {
                info!(node = %name, %profile, "Cluster node created");
                tracing::debug!(node = %name, "{}", message);
                NodeResult::changed(
                    name,
                    format!("Cluster node {} created from cloud profile {}", name, profile),
                )
            }
            Err(e) => {
                warn!(node = %name, %profile, error = %e, "Cluster node creation failed");
                NodeResult::failed(name, e.to_string())
            }
        }
    }

    /// Make sure the node does not exist
    pub async fn node_absent(&self, name: &str) -> NodeResult {
        match self.existence.has_instance(name).await {
            Ok(false) => {
                return NodeResult::unchanged(
                    name,
                    format!("Cluster node {} already absent", name),
                );
            }
            Ok(true) => {}
            Err(e) => {
                warn!(node = %name, error = %e, "Existence check failed");
                return NodeResult::failed(name, e.to_string());
            }
        }

        if self.options.dry_run {
            return NodeResult::pending(
                name,
                format!("Cluster node {} is set to be destroyed", name),
            );
        }

        match self.lifecycle.destroy_node(name, &self.options.roster).await {
            Ok(message) => {
                info!(node = %name, "Cluster node destroyed");
                tracing::debug!(node = %name, "{}", message);
                NodeResult::changed(name, format!("Cluster node {} destroyed", name))
            }
            Err(e) => {
                warn!(node = %name, error = %e, "Cluster node destruction failed");
                NodeResult::failed(name, e.to_string())
            }
        }
    }

    /// Make sure every declared node exists
    pub async fn present(&self, name: &str, profiles: &[ProfileNodes]) -> ClusterResult {
        let mut nodes = Vec::new();
        for entry in profiles {
            for node in &entry.nodes {
                nodes.push(self.node_present(node, &entry.profile).await);
            }
        }
        ClusterResult::aggregate(name, ClusterAction::Create, nodes)
    }

    /// Make sure none of the declared nodes exist
    pub async fn absent(&self, name: &str, profiles: &[ProfileNodes]) -> ClusterResult {
        let mut nodes = Vec::new();
        for entry in profiles {
            for node in &entry.nodes {
                nodes.push(self.node_absent(node).await);
            }
        }
        ClusterResult::aggregate(name, ClusterAction::Destroy, nodes)
    }
}
