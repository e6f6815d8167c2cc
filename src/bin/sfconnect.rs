//! Command-line access to the session connector.
//!
//! Credentials come from the environment (see `ConnectorOptions::from_env`).
//!
//! ```sh
//! export SF_USERNAME='api@example.com'
//! export SF_PASSWORD='passwordSECURITYTOKEN'
//! sfconnect query "SELECT Id, Name FROM Account LIMIT 10"
//! sfconnect delete Account 001xx000003DgAAAS 001xx000003DgABAAS
//! ```
//!
//! Set `RUST_LOG=sfconnect_session=debug` to trace every page and chunk.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sfconnect::{
    CancellationToken, ConnectorOptions, DataModificationType, SObjectRecord, SessionClient,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Query and delete Salesforce records over a username/password session.
#[derive(Parser, Debug)]
#[command(name = "sfconnect")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a SOQL query and print every record as JSON.
    Query {
        /// SOQL text; multiple arguments are joined with spaces.
        #[arg(required = true)]
        soql: Vec<String>,
    },

    /// Delete records by id and print the per-record results.
    Delete {
        /// sObject type, e.g. Account.
        object_type: String,

        /// Record ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ConnectorOptions::from_env().context("failed to load connector options")?;
    let client = SessionClient::new(options)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    client.log_in(&cancel).await.context("login failed")?;
    if !client.is_logged_in() {
        bail!("login was cancelled");
    }

    let outcome = run(&client, cli.command, &cancel).await;
    // Revoke even after Ctrl-C; the run token may already be cancelled.
    let logout = client.log_out(&CancellationToken::new()).await;
    let output = settle(outcome, logout)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(
    client: &SessionClient,
    command: Command,
    cancel: &CancellationToken,
) -> Result<serde_json::Value> {
    match command {
        Command::Query { soql } => {
            let soql = soql.join(" ");
            let records: Vec<serde_json::Value> = client
                .query_data(&soql, cancel)
                .await
                .context("query failed")?;
            Ok(serde_json::Value::Array(records))
        }
        Command::Delete { object_type, ids } => {
            let records: Vec<SObjectRecord> = ids
                .into_iter()
                .map(|id| SObjectRecord::new(object_type.as_str()).with_id(id))
                .collect();
            let results = client
                .modify_data_default(&records, DataModificationType::Delete, cancel)
                .await
                .context("delete failed")?;
            Ok(serde_json::to_value(results)?)
        }
    }
}

/// The command's error wins over a logout failure, which is then only logged.
fn settle(
    outcome: Result<serde_json::Value>,
    logout: sfconnect::session::Result<()>,
) -> Result<serde_json::Value> {
    match (outcome, logout) {
        (Ok(output), Ok(())) => Ok(output),
        (Ok(_), Err(e)) => Err(anyhow::Error::new(e).context("logout failed")),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(logout_error)) => {
            warn!(error = %logout_error, "Logout failed");
            Err(e)
        }
    }
}
