//! Error types for sfconnect-session.
//!
//! Error messages never include session tokens or passwords.

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for connector operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the remote system answered with a non-success status.
    pub fn is_http_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Http { .. })
    }

    /// The HTTP status of a failed response, if this is an HTTP error.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Http { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Returns true if the operation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Non-success status; `message` is the response body.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// HTTP verb the collections endpoint does not accept.
    #[error("HTTP method {0} is not supported")]
    UnsupportedMethod(String),

    /// Unknown data modification type.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A login is already running on this client.
    #[error("A login operation is already in progress")]
    LoginInProgress,

    /// Query pages delivered more records than the reported total size.
    #[error("Query returned more records than its reported total size of {total_size} (received {received})")]
    ResultOverflow { total_size: usize, received: usize },

    /// Login response did not contain the expected markers.
    #[error("Malformed login response: {0}")]
    MalformedLoginResponse(String),

    /// An authenticated message was requested before a successful login.
    #[error("Not authenticated: log in first")]
    NotAuthenticated,

    /// A record cannot be sent as requested.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The operation was cancelled.
    #[error("Operation cancelled")]
    Cancelled,

    /// The transport failed before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<sfconnect_client::Error> for Error {
    fn from(err: sfconnect_client::Error) -> Self {
        let kind = match &err.kind {
            sfconnect_client::ErrorKind::Json(message) => ErrorKind::Json(message.clone()),
            sfconnect_client::ErrorKind::Config(message) => ErrorKind::Config(message.clone()),
            other => ErrorKind::Transport(other.to_string()),
        };
        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}
