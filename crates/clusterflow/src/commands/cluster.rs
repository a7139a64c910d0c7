use crate::report;
use anyhow::Context;
use clusterflow_cloud::{ClusterDeclaration, Outcome, Reconciler};
use std::path::Path;

async fn load_declaration(file: &Path) -> anyhow::Result<ClusterDeclaration> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read cluster declaration {}", file.display()))?;

    ClusterDeclaration::from_yaml(&content)
        .with_context(|| format!("Invalid cluster declaration {}", file.display()))
}

pub async fn handle_present(
    reconciler: &Reconciler,
    file: &Path,
    json: bool,
) -> anyhow::Result<Outcome> {
    let declaration = load_declaration(file).await?;
    tracing::info!(
        cluster = %declaration.name,
        nodes = declaration.nodes().count(),
        "Converging cluster to present"
    );

    let result = reconciler
        .present(&declaration.name, &declaration.profiles)
        .await;
    report::print_cluster(&result, json)?;
    Ok(result.result)
}

pub async fn handle_absent(
    reconciler: &Reconciler,
    file: &Path,
    json: bool,
) -> anyhow::Result<Outcome> {
    let declaration = load_declaration(file).await?;
    tracing::info!(
        cluster = %declaration.name,
        nodes = declaration.nodes().count(),
        "Converging cluster to absent"
    );

    let result = reconciler
        .absent(&declaration.name, &declaration.profiles)
        .await;
    report::print_cluster(&result, json)?;
    Ok(result.result)
}
