//! Direct lifecycle calls that skip the existence check

use crate::report;
use clusterflow_cloud::{CreateNodeRequest, NodeLifecycle, NodeResult, Outcome, ReconcileOptions};

pub async fn handle_create(
    lifecycle: &dyn NodeLifecycle,
    options: &ReconcileOptions,
    name: &str,
    profile: &str,
    json: bool,
) -> anyhow::Result<Outcome> {
    let result = if options.dry_run {
        NodeResult::pending(
            name,
            format!("Node {} would be created from cloud profile {}", name, profile),
        )
    } else {
        let request = CreateNodeRequest {
            name: name.to_string(),
            profile: profile.to_string(),
            user: options.user.clone(),
            roster: options.roster.clone(),
            sudo: options.sudo,
        };
        match lifecycle.create_node(&request).await {
            Ok(message) => NodeResult::changed(name, message),
            Err(e) => NodeResult::failed(name, e.to_string()),
        }
    };

    report::print_node(&result, json)?;
    Ok(result.result)
}

pub async fn handle_destroy(
    lifecycle: &dyn NodeLifecycle,
    options: &ReconcileOptions,
    name: &str,
    json: bool,
) -> anyhow::Result<Outcome> {
    let result = if options.dry_run {
        NodeResult::pending(name, format!("Node {} would be destroyed", name))
    } else {
        match lifecycle.destroy_node(name, &options.roster).await {
            Ok(message) => NodeResult::changed(name, message),
            Err(e) => NodeResult::failed(name, e.to_string()),
        }
    };

    report::print_node(&result, json)?;
    Ok(result.result)
}
