//! clusterflow cluster engine
//!
//! Converges a declared set of cloud nodes and a connection roster.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 clusterflow CLI                  │
//! │        (present / absent / node-present ...)     │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               clusterflow-cloud                  │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │              Reconciler                   │   │
//! │  │  trait NodeLifecycle                      │   │
//! │  │  trait InstanceExistenceChecker           │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │    Roster    │  │   Results    │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────────────┐
//! │ clusterflow-cloud-salt │
//! │   (salt-cloud CLI)     │
//! └────────────────────────┘
//! ```

pub mod cluster;
pub mod error;
pub mod provider;
pub mod reconcile;
pub mod result;
pub mod roster;

// Re-exports
pub use cluster::{ClusterDeclaration, ProfileNodes};
pub use error::{CloudError, Result};
pub use provider::{
    CommandOutput, CommandRunner, CreateNodeRequest, InstanceExistenceChecker, NodeLifecycle,
};
pub use reconcile::{ReconcileOptions, Reconciler};
pub use result::{ClusterAction, ClusterChanges, ClusterResult, NodeChanges, NodeResult, Outcome};
pub use roster::{FileEditor, LocalFiles, Roster, RosterEntry};
