//! # sfconnect
//!
//! A session-aware Salesforce connector for Rust.
//!
//! Log in with a username and password, run SOQL queries whose result pages are
//! collected for you, and insert, update or delete any number of records through
//! sObject Collections in chunks the API accepts.
//!
//! ## Security
//!
//! - Passwords and session tokens are redacted in Debug output
//! - Tracing spans skip credentials, tokens and record payloads
//!
//! ## Crates
//!
//! - **sfconnect-client** - HTTP transport: request/response descriptors and a pooled reqwest client
//! - **sfconnect-session** - Session state, message building, login, query pagination and chunked modifications
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sfconnect::{CancellationToken, ConnectorOptions, SessionClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SessionClient::new(ConnectorOptions::from_env()?)?;
//!     let cancel = CancellationToken::new();
//!
//!     client.log_in(&cancel).await?;
//!
//!     let accounts: Vec<serde_json::Value> = client
//!         .query_data("SELECT Id, Name FROM Account LIMIT 10", &cancel)
//!         .await?;
//!
//!     for account in accounts {
//!         println!("{}", account["Name"]);
//!     }
//!
//!     client.log_out(&cancel).await?;
//!     Ok(())
//! }
//! ```

#[cfg(feature = "client")]
pub use sfconnect_client as client;
#[cfg(feature = "session")]
pub use sfconnect_session as session;

#[cfg(feature = "client")]
pub use sfconnect_client::{ClientConfig, HttpTransport, SfHttpClient};
#[cfg(feature = "session")]
pub use sfconnect_session::{
    CancellationToken, ConnectorOptions, DataModificationResult, DataModificationType,
    SObjectRecord, SessionClient,
};
