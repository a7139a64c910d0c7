//! salt-cloud CLI wrapper
//!
//! Wraps the salt-cloud commands used to create, destroy and query nodes.
//! salt-cloud prints progress lines before its JSON document, so stdout is
//! split before parsing.

use async_trait::async_trait;
use clusterflow_cloud::{CloudError, CommandOutput, CommandRunner, Result};
use serde_json::Value;
use std::io::ErrorKind;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

/// [`CommandRunner`] spawning real processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!("Running: {} {}", program, args.join(" "));

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| {
                    CloudError::Timeout(format!(
                        "{} did not finish within {}s",
                        program,
                        limit.as_secs()
                    ))
                })?,
            None => cmd.output().await,
        }
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => CloudError::CommandFailed(format!("{} not found", program)),
            _ => CloudError::CommandFailed(format!("{}: {}", program, e)),
        })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Separate the human readable preamble from the trailing JSON document
///
/// The payload starts at the first line that begins with `[` or `{` once
/// surrounding whitespace is ignored. Without such a line the whole input is
/// preamble and the payload is empty.
pub fn split_output(raw: &str) -> (String, String) {
    let lines: Vec<&str> = raw.lines().collect();
    let start = lines
        .iter()
        .position(|line| {
            let line = line.trim();
            line.starts_with('[') || line.starts_with('{')
        })
        .unwrap_or(lines.len());

    (lines[..start].join("\n"), lines[start..].join("\n"))
}

/// Parse the JSON payload, keeping stderr for the error message
pub fn parse_payload(payload: &str, stderr: &str) -> Result<Value> {
    if payload.trim().is_empty() {
        return Err(CloudError::EmptyToolOutput {
            stderr: stderr.to_string(),
        });
    }

    serde_json::from_str(payload).map_err(|e| CloudError::ExternalToolOutput {
        message: e.to_string(),
        stderr: stderr.to_string(),
    })
}

/// Parsed salt-cloud invocation
#[derive(Debug, Clone)]
pub struct ToolResponse {
    pub preamble: String,
    pub payload: Value,
    pub stderr: String,
}

/// salt-cloud CLI wrapper
#[derive(Clone)]
pub struct SaltCloud {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl SaltCloud {
    pub fn new(program: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run salt-cloud with JSON output and parse what it printed
    ///
    /// The exit status is only logged. Whether the call did what was asked
    /// is decided from the JSON document.
    async fn run_command(&self, args: &[&str]) -> Result<ToolResponse> {
        let args: Vec<String> = ["--output=json", "--assume-yes"]
            .iter()
            .chain(args)
            .map(|a| a.to_string())
            .collect();

        let output = self.runner.run(&self.program, &args).await?;
        if !output.success() {
            tracing::debug!(
                status = ?output.status,
                "{} exited unsuccessfully: {}",
                self.program,
                output.stderr.trim()
            );
        }

        let (preamble, payload) = split_output(&output.stdout);
        let payload = parse_payload(&payload, &output.stderr)?;

        Ok(ToolResponse {
            preamble,
            payload,
            stderr: output.stderr,
        })
    }

    /// Create a node from a profile, without deploying a minion
    pub async fn create(&self, profile: &str, name: &str) -> Result<ToolResponse> {
        self.run_command(&["--no-deploy", "--profile", profile, name])
            .await
    }

    /// Destroy a node
    pub async fn destroy(&self, name: &str) -> Result<ToolResponse> {
        self.run_command(&["--destroy", name]).await
    }

    /// List the nodes of every configured provider
    pub async fn query(&self) -> Result<ToolResponse> {
        self.run_command(&["--query"]).await
    }
}

/// Whether a `--query` document lists `name`
///
/// The document is shaped `provider -> driver -> node name -> details`.
pub fn query_lists_node(payload: &Value, name: &str) -> bool {
    payload
        .as_object()
        .into_iter()
        .flat_map(|providers| providers.values())
        .filter_map(Value::as_object)
        .flat_map(|drivers| drivers.values())
        .filter_map(Value::as_object)
        .any(|nodes| nodes.contains_key(name))
}
