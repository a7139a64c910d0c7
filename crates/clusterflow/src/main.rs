mod commands;
mod report;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use clusterflow_cloud::{Outcome, ReconcileOptions, Reconciler};
use clusterflow_cloud_salt::SaltCloudProvider;
use clusterflow_config::Settings;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "clusterflow")]
#[command(about = "Create and destroy clusters of salt-cloud nodes", long_about = None)]
struct Cli {
    /// Dry-run: report what would change without creating or destroying anything
    #[arg(long, global = true)]
    test: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Roster file receiving one entry per node
    #[arg(long, global = true, env = "CLUSTERFLOW_ROSTER")]
    roster: Option<PathBuf>,

    /// Directory of salt-cloud profile files
    #[arg(long, global = true)]
    profiles_dir: Option<PathBuf>,

    /// Directory of salt-cloud provider files
    #[arg(long, global = true)]
    providers_dir: Option<PathBuf>,

    /// salt-cloud executable
    #[arg(long, global = true, env = "CLUSTERFLOW_SALT_CLOUD")]
    salt_cloud: Option<String>,

    /// Give up on a salt-cloud call after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// SSH user for profiles without ssh_username
    #[arg(long, global = true)]
    user: Option<String>,

    /// Mark non-root roster users for sudo
    #[arg(long, global = true)]
    sudo: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Make sure every node of a cluster declaration exists
    Present {
        /// Cluster declaration (YAML)
        file: PathBuf,
    },
    /// Make sure no node of a cluster declaration exists
    Absent {
        /// Cluster declaration (YAML)
        file: PathBuf,
    },
    /// Make sure one node exists
    NodePresent {
        /// Node name
        name: String,
        /// Cloud profile to create the node from
        #[arg(short, long)]
        profile: String,
    },
    /// Make sure one node does not exist
    NodeAbsent {
        /// Node name
        name: String,
    },
    /// Create a node and add it to the roster, without checking first
    CreateNode {
        /// Node name
        name: String,
        /// Cloud profile to create the node from
        #[arg(short, long)]
        profile: String,
    },
    /// Destroy a node and remove it from the roster, without checking first
    DestroyNode {
        /// Node name
        name: String,
    },
    /// Inspect the roster
    #[command(subcommand)]
    Roster(RosterCommands),
    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum RosterCommands {
    /// List node names in the roster
    List,
    /// Show the roster entry of a node
    Show {
        /// Node name
        name: String,
    },
}

impl Cli {
    /// Settings file values with command line overrides applied
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::load().context("Failed to load settings")?;

        if let Some(roster) = &self.roster {
            settings.roster = roster.clone();
        }
        if let Some(dir) = &self.profiles_dir {
            settings.profiles_dir = dir.clone();
        }
        if let Some(dir) = &self.providers_dir {
            settings.providers_dir = dir.clone();
        }
        if let Some(salt_cloud) = &self.salt_cloud {
            settings.salt_cloud = salt_cloud.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_secs = Some(timeout);
        }
        if let Some(user) = &self.user {
            settings.user = user.clone();
        }
        if self.sudo {
            settings.sudo = true;
        }

        Ok(settings)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if matches!(cli.command, Commands::Version) {
        println!("clusterflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = cli.settings()?;
    tracing::debug!(?settings, "Effective settings");

    if let Commands::Roster(ref roster_cmd) = cli.command {
        match roster_cmd {
            RosterCommands::List => commands::roster::handle_list(&settings, cli.json).await?,
            RosterCommands::Show { name } => {
                commands::roster::handle_show(&settings, name, cli.json).await?
            }
        }
        return Ok(());
    }

    let provider = Arc::new(SaltCloudProvider::from_settings(&settings));
    let reconciler = Reconciler::new(
        provider.clone(),
        provider.clone(),
        ReconcileOptions {
            dry_run: cli.test,
            user: settings.user.clone(),
            roster: settings.roster.clone(),
            sudo: settings.sudo,
        },
    );

    let outcome = match cli.command {
        Commands::Present { file } => {
            commands::cluster::handle_present(&reconciler, &file, cli.json).await?
        }
        Commands::Absent { file } => {
            commands::cluster::handle_absent(&reconciler, &file, cli.json).await?
        }
        Commands::NodePresent { name, profile } => {
            let result = reconciler.node_present(&name, &profile).await;
            report::print_node(&result, cli.json)?;
            result.result
        }
        Commands::NodeAbsent { name } => {
            let result = reconciler.node_absent(&name).await;
            report::print_node(&result, cli.json)?;
            result.result
        }
        Commands::CreateNode { name, profile } => {
            commands::node::handle_create(
                &*provider,
                reconciler.options(),
                &name,
                &profile,
                cli.json,
            )
            .await?
        }
        Commands::DestroyNode { name } => {
            commands::node::handle_destroy(&*provider, reconciler.options(), &name, cli.json)
                .await?
        }
        Commands::Roster(_) | Commands::Version => unreachable!("handled above"),
    };

    if outcome == Outcome::Failure {
        std::process::exit(1);
    }
    Ok(())
}
