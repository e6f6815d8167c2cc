//! Session state derived from a SOAP login response.

use crate::error::{Error, ErrorKind, Result};

const SESSION_ID_START: &str = "<sessionId>";
const SESSION_ID_END: &str = "</sessionId>";
const SERVER_URL_START: &str = "<serverUrl>";
const SERVER_URL_END: &str = "/services/Soap/c/";

/// An authenticated session: token, per-session endpoint and the
/// authorization header value derived from the token.
///
/// The token is redacted in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    endpoint: String,
    authorization: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session from a token and the server base URL.
    pub fn new(token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let token = token.into();
        let authorization = format!("Bearer {}", token);
        Self {
            token,
            endpoint: endpoint.into(),
            authorization,
        }
    }

    /// Parse a raw login response body.
    ///
    /// The token is the text between `<sessionId>` and `</sessionId>`; the endpoint is
    /// the text between `<serverUrl>` and `/services/Soap/c/`.
    pub fn from_login_response(body: &[u8]) -> Result<Self> {
        let token = extract_between(body, SESSION_ID_START, SESSION_ID_END)?;
        let endpoint = extract_between(body, SERVER_URL_START, SERVER_URL_END)?;
        if token.is_empty() {
            return Err(Error::new(ErrorKind::MalformedLoginResponse(
                "empty session id".to_string(),
            )));
        }
        Ok(Self::new(token, endpoint))
    }

    /// Opaque session token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Server base URL used as prefix for authenticated calls.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `Authorization` header value: `Bearer {token}`.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }
}

/// Byte-level substring extraction. The end marker is searched after the start marker.
fn extract_between(body: &[u8], start: &str, end: &str) -> Result<String> {
    let content_start = find(body, start.as_bytes())
        .map(|idx| idx + start.len())
        .ok_or_else(|| {
            Error::new(ErrorKind::MalformedLoginResponse(format!(
                "missing {} marker",
                start
            )))
        })?;
    let remaining = &body[content_start..];
    let len = find(remaining, end.as_bytes()).ok_or_else(|| {
        Error::new(ErrorKind::MalformedLoginResponse(format!(
            "missing {} marker after {}",
            end, start
        )))
    })?;

    String::from_utf8(remaining[..len].to_vec()).map_err(|e| {
        Error::with_source(
            ErrorKind::MalformedLoginResponse(format!("value after {} is not UTF-8", start)),
            e,
        )
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
