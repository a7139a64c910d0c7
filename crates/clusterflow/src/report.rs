//! Human and JSON rendering of node and cluster results

use clusterflow_cloud::{ClusterResult, NodeResult, Outcome};
use colored::{ColoredString, Colorize};

fn marker(outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Success => "✓".green(),
        Outcome::Pending => "~".yellow(),
        Outcome::Failure => "✗".red(),
    }
}

fn headline(outcome: Outcome, text: &str) -> ColoredString {
    match outcome {
        Outcome::Success => text.green().bold(),
        Outcome::Pending => text.yellow().bold(),
        Outcome::Failure => text.red().bold(),
    }
}

pub fn print_node(result: &NodeResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!(
        "{} {}",
        marker(result.result),
        headline(result.result, &result.comment)
    );
    Ok(())
}

pub fn print_cluster(result: &ClusterResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    for node in &result.nodes {
        // Failure comments can span several lines of tool output
        let mut lines = node.comment.lines();
        println!(
            "  {} {}",
            marker(node.result),
            lines.next().unwrap_or(&node.name)
        );
        for line in lines {
            println!("    {}", line.dimmed());
        }
    }

    println!();
    let summary = match result.result {
        Outcome::Failure => format!(
            "Cluster {} failed: {} of {} nodes",
            result.name,
            result.failures().count(),
            result.nodes.len()
        ),
        _ => result.comment.clone(),
    };
    println!("{} {}", marker(result.result), headline(result.result, &summary));
    Ok(())
}
