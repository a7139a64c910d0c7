use clusterflow_cloud::{Roster, RosterEntry};
use clusterflow_config::{Auth, Settings};
use colored::Colorize;

pub async fn handle_list(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let roster = Roster::new(&settings.roster);
    let names = roster.names().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    if names.is_empty() {
        println!(
            "{}",
            format!("No nodes in roster {}", roster.path().display()).dimmed()
        );
        return Ok(());
    }

    println!("{}", roster.path().display().to_string().cyan());
    for name in names {
        println!("  • {}", name);
    }
    Ok(())
}

pub async fn handle_show(settings: &Settings, name: &str, json: bool) -> anyhow::Result<()> {
    let roster = Roster::new(&settings.roster);
    let entry = roster.get(name).await?.ok_or_else(|| {
        anyhow::anyhow!(
            "Node '{}' is not in roster {}",
            name,
            roster.path().display()
        )
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry_json(&entry))?);
        return Ok(());
    }

    println!("{}", entry.name.bold());
    println!("  host: {}", entry.host.cyan());
    println!("  user: {}", entry.user);
    println!("  auth: {}", auth_label(&entry.auth));
    if entry.sudo {
        println!("  sudo: {}", "yes".yellow());
    }
    Ok(())
}

/// Secrets are never printed, only how the node authenticates
fn auth_label(auth: &Auth) -> String {
    match auth {
        Auth::Password(_) => "password".to_string(),
        Auth::KeyFile(path) => format!("key file {}", path.display()),
        Auth::PrivateKey(_) => "inline private key".to_string(),
    }
}

fn entry_json(entry: &RosterEntry) -> serde_json::Value {
    serde_json::json!({
        "name": entry.name,
        "host": entry.host,
        "user": entry.user,
        "auth": auth_label(&entry.auth),
        "sudo": entry.sudo,
        "tty": entry.tty,
    })
}
