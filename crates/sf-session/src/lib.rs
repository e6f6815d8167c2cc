//! # sfconnect-session
//!
//! Session-aware Salesforce connector.
//!
//! This crate keeps the state of one authenticated session and turns logical
//! operations into protocol messages:
//! - SOAP username/password login and token revocation
//! - SOQL queries, with every result page collected into one `Vec`
//! - Insert, update and delete through sObject Collections, split into chunks of
//!   at most 200 records
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SessionClient                         │
//! │  - Single-flight login                                      │
//! │  - Query pagination loop                                    │
//! │  - Chunked collections requests                             │
//! └─────────────────────────────────────────────────────────────┘
//!            │ builds / parses                 │ sends
//!            ▼                                 ▼
//! ┌──────────────────────────┐   ┌──────────────────────────────┐
//! │      MessageBuilder      │   │        HttpTransport         │
//! │  - Session token         │   │  (SfHttpClient by default)   │
//! │  - Per-session endpoint  │   │                              │
//! └──────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfconnect_session::{
//!     CancellationToken, ConnectorOptions, DataModificationType, SObjectRecord, SessionClient,
//! };
//!
//! let client = SessionClient::new(ConnectorOptions::from_env()?)?;
//! let cancel = CancellationToken::new();
//! client.log_in(&cancel).await?;
//!
//! let accounts: Vec<SObjectRecord> = client
//!     .query_data("SELECT Id, Name FROM Account", &cancel)
//!     .await?;
//!
//! let results = client
//!     .modify_data(&accounts, DataModificationType::Delete, false, &cancel)
//!     .await?;
//!
//! client.log_out(&cancel).await?;
//! ```

mod client;
mod error;
mod message;
mod options;
mod session;
mod types;

pub use client::SessionClient;
pub use error::{Error, ErrorKind, Result};
pub use message::MessageBuilder;
pub use options::ConnectorOptions;
pub use session::Session;
pub use types::{
    CollectionRequest, DataModificationResult, DataModificationType, QueryResult,
    SObjectAttributes, SObjectRecord, SalesforceError, SalesforceObject,
};

pub use tokio_util::sync::CancellationToken;

/// Production login host.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Sandbox login host.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

/// Default Salesforce API version.
pub const DEFAULT_API_VERSION: &str = "62.0";

/// Largest number of records one sObject Collections request accepts.
pub const MAX_BATCH_SIZE: usize = 200;
