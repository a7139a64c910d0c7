//! salt-cloud backend for clusterflow
//!
//! Implements [`NodeLifecycle`](clusterflow_cloud::NodeLifecycle) and
//! [`InstanceExistenceChecker`](clusterflow_cloud::InstanceExistenceChecker)
//! by shelling out to `salt-cloud`.
//!
//! # Requirements
//!
//! - `salt-cloud` must be installed, with providers and profiles configured
//!   under `/etc/salt/cloud.providers.d` and `/etc/salt/cloud.profiles.d`
//!   (or the directories given in the settings)
//!
//! # Example
//!
//! ```ignore
//! use clusterflow_cloud::{CreateNodeRequest, NodeLifecycle};
//! use clusterflow_cloud_salt::SaltCloudProvider;
//! use clusterflow_config::Settings;
//!
//! let provider = SaltCloudProvider::from_settings(&Settings::default());
//! let message = provider
//!     .create_node(&CreateNodeRequest {
//!         name: "jmoney-master".into(),
//!         profile: "linode-centos-7".into(),
//!         user: "root".into(),
//!         roster: "/etc/salt/cluster/roster".into(),
//!         sudo: false,
//!     })
//!     .await?;
//! ```

pub mod normalize;
pub mod provider;
pub mod salt_cloud;

pub use normalize::{Driver, extract_address, is_private_address};
pub use provider::{SaltCloudProvider, destroy_confirmed};
pub use salt_cloud::{ProcessRunner, SaltCloud, ToolResponse, parse_payload, split_output};
