//! Connector configuration.
//!
//! The password is redacted in Debug output.

use crate::error::{Error, ErrorKind, Result};
use crate::{DEFAULT_API_VERSION, MAX_BATCH_SIZE, PRODUCTION_LOGIN_URL, SANDBOX_LOGIN_URL};

/// Read-only settings consumed by [`MessageBuilder`](crate::MessageBuilder).
#[derive(Clone)]
pub struct ConnectorOptions {
    username: String,
    password: String,
    api_version: String,
    login_url: String,
    all_or_none: bool,
    batch_size: usize,
}

impl std::fmt::Debug for ConnectorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorOptions")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("login_url", &self.login_url)
            .field("all_or_none", &self.all_or_none)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl ConnectorOptions {
    /// Create options for a production org with default settings.
    ///
    /// The password may need the security token appended: `[password][securityToken]`.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            login_url: PRODUCTION_LOGIN_URL.to_string(),
            all_or_none: false,
            batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Load options from environment variables.
    ///
    /// Required:
    /// - `SF_USERNAME` or `SALESFORCE_USERNAME`
    /// - `SF_PASSWORD` or `SALESFORCE_PASSWORD`
    ///
    /// Optional:
    /// - `SF_API_VERSION` (default: "62.0")
    /// - `SF_LOGIN_URL` (default: production login URL)
    /// - `SF_SANDBOX` - "true" or "1" selects the sandbox login URL when `SF_LOGIN_URL` is unset
    /// - `SF_ALL_OR_NONE` - default batch semantics (default: false)
    /// - `SF_BATCH_SIZE` - records per collections request, at most 200
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let username = lookup("SF_USERNAME")
            .or_else(|| lookup("SALESFORCE_USERNAME"))
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_USERNAME".to_string())))?;
        let password = lookup("SF_PASSWORD")
            .or_else(|| lookup("SALESFORCE_PASSWORD"))
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_PASSWORD".to_string())))?;

        let mut options = Self::new(username, password);

        if let Some(version) = lookup("SF_API_VERSION") {
            options = options.with_api_version(version);
        }

        let sandbox = lookup("SF_SANDBOX")
            .map(|v| parse_flag("SF_SANDBOX", &v))
            .transpose()?
            .unwrap_or(false);
        match lookup("SF_LOGIN_URL") {
            Some(url) => options = options.with_login_url(url),
            None if sandbox => options = options.sandbox(),
            None => {}
        }

        if let Some(value) = lookup("SF_ALL_OR_NONE") {
            options = options.with_all_or_none(parse_flag("SF_ALL_OR_NONE", &value)?);
        }

        if let Some(value) = lookup("SF_BATCH_SIZE") {
            let size = value.trim().parse::<usize>().map_err(|_| {
                Error::new(ErrorKind::Config(format!(
                    "SF_BATCH_SIZE must be a positive integer, got '{}'",
                    value
                )))
            })?;
            options = options.with_batch_size(size);
        }

        options.validate()?;
        Ok(options)
    }

    /// Set the API version (e.g., "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the login host (e.g. `https://login.salesforce.com` or a My Domain URL).
    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use the sandbox login host.
    pub fn sandbox(self) -> Self {
        self.with_login_url(SANDBOX_LOGIN_URL)
    }

    /// Set the default `allOrNone` flag used by `modify_data_default`.
    pub fn with_all_or_none(mut self, all_or_none: bool) -> Self {
        self.all_or_none = all_or_none;
        self
    }

    /// Override the records-per-request batch size. Clamped to `1..=200`.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    /// Check that credentials are present and the login URL parses.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "username must not be empty".to_string(),
            )));
        }
        if self.password.is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "password must not be empty".to_string(),
            )));
        }
        if self.api_version.is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "API version must not be empty".to_string(),
            )));
        }
        url::Url::parse(&self.login_url)?;
        Ok(())
    }

    /// The API user's username.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// The API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The login host.
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Default `allOrNone` flag.
    pub fn all_or_none(&self) -> bool {
        self.all_or_none
    }

    /// Records per collections request.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// SOAP login endpoint: `{login_url}/services/Soap/c/{version}/`.
    pub fn login_endpoint(&self) -> String {
        format!("{}/services/Soap/c/{}/", self.login_url, self.api_version)
    }

    /// Token revocation endpoint; the session token is appended.
    pub fn logout_endpoint(&self) -> String {
        format!("{}/services/oauth2/revoke?token=", self.login_url)
    }

    /// Query path relative to the session endpoint; the SOQL text is appended.
    pub fn query_path(&self) -> String {
        format!("/services/data/v{}/query/?q=", self.api_version)
    }

    /// sObject Collections path relative to the session endpoint.
    pub fn collections_path(&self) -> String {
        format!("/services/data/v{}/composite/sobjects", self.api_version)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(Error::new(ErrorKind::Config(format!(
            "{} must be true or false, got '{}'",
            name, value
        )))),
    }
}
