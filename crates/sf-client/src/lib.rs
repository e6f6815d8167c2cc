//! # sfconnect-client
//!
//! HTTP transport for the sfconnect Salesforce connector.
//!
//! This crate provides the plumbing the session layer sends its messages through:
//! - [`Request`] / [`Response`] descriptors (verb, URL, headers, body / status, headers, body)
//! - The [`HttpTransport`] trait, the seam tests substitute
//! - [`SfHttpClient`], a reqwest-backed transport with connection pooling and compression
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    sfconnect-session                        │
//! │  MessageBuilder -> Request        Response -> typed result  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 HttpTransport (SfHttpClient)                │
//! │  - One request in, one buffered response out                │
//! │  - No retries; non-2xx statuses are returned, not raised    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfconnect_client::{HttpTransport, Request, SfHttpClient};
//!
//! let client = SfHttpClient::shared()?;
//! let response = client
//!     .send(Request::get("https://na1.salesforce.com/services/data/").authorization("Bearer ..."))
//!     .await?;
//! assert!(response.is_success());
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod transport;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{Request, RequestBody, RequestMethod, CONTENT_TYPE_JSON, CONTENT_TYPE_XML};
pub use response::Response;
pub use transport::HttpTransport;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("sfconnect/", env!("CARGO_PKG_VERSION"));
