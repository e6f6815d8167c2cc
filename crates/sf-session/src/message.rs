//! Session-aware construction and parsing of protocol messages.

use serde::de::DeserializeOwned;
use sfconnect_client::{Request, RequestMethod, Response};
use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::options::ConnectorOptions;
use crate::session::Session;
use crate::types::{CollectionRequest, SalesforceObject};

const SOAP_ACTION_KEY: &str = "SOAPAction";
const SOAP_ACTION_VALUE: &str = "\"\"";

/// Translates logical operations into [`Request`]s and responses into typed
/// results or session updates.
///
/// Holds the read-only [`ConnectorOptions`] and the current [`Session`], if any.
/// Only [`process_login_response`](Self::process_login_response) mutates the session;
/// every authenticated builder reads it and fails with
/// [`ErrorKind::NotAuthenticated`] before the first successful login.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    options: ConnectorOptions,
    session: Option<Session>,
}

impl MessageBuilder {
    /// Create an unauthenticated builder.
    pub fn new(options: ConnectorOptions) -> Self {
        Self {
            options,
            session: None,
        }
    }

    /// The configuration this builder was created with.
    pub fn options(&self) -> &ConnectorOptions {
        &self.options
    }

    /// The current session, if a login has succeeded.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether a login has succeeded.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn require_session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::NotAuthenticated))
    }

    /// Build the SOAP login request for the configured credentials.
    pub fn build_login_message(&self) -> Request {
        let endpoint = self.options.login_endpoint();
        debug!(endpoint = %endpoint, "Building login message");
        Request::post(endpoint)
            .xml(login_envelope(self.options.username(), self.options.password()))
            .header(SOAP_ACTION_KEY, SOAP_ACTION_VALUE)
    }

    /// Store the session carried by a successful login response.
    ///
    /// On any failure the previous session, if any, is left untouched.
    pub fn process_login_response(&mut self, response: Response) -> Result<()> {
        check_status(&response)?;
        let session = Session::from_login_response(response.body())?;
        debug!(endpoint = %session.endpoint(), "Received session endpoint");
        self.session = Some(session);
        Ok(())
    }

    /// Build the token revocation request for the current session.
    pub fn build_logout_message(&self) -> Result<Request> {
        let session = self.require_session()?;
        debug!("Building logout message");
        Ok(Request::get(format!(
            "{}{}",
            self.options.logout_endpoint(),
            session.token()
        )))
    }

    /// Build a query request.
    ///
    /// With `is_continuation == false`, `query` is SOQL text and the request targets the
    /// query resource. With `is_continuation == true`, `query` is the `nextRecordsUrl` of
    /// a previous page and is appended to the endpoint verbatim.
    pub fn build_query_message(&self, query: &str, is_continuation: bool) -> Result<Request> {
        let session = self.require_session()?;
        let url = if is_continuation {
            format!("{}{}", session.endpoint(), query)
        } else {
            format!("{}{}{}", session.endpoint(), self.options.query_path(), query)
        };
        Ok(Request::get(url).authorization(session.authorization()))
    }

    /// Build a collections request for one chunk of records.
    ///
    /// POST and PATCH send `{"allOrNone", "records"}` as JSON; DELETE sends the record
    /// ids in the query string. Other verbs are rejected.
    pub fn build_data_change_message<T: SalesforceObject>(
        &self,
        records: &[T],
        method: RequestMethod,
        all_or_none: bool,
    ) -> Result<Request> {
        match method {
            RequestMethod::Post | RequestMethod::Patch => {
                self.build_post_patch_message(records, method, all_or_none)
            }
            RequestMethod::Delete => self.build_delete_message(records, all_or_none),
            other => Err(Error::new(ErrorKind::UnsupportedMethod(
                other.as_str().to_string(),
            ))),
        }
    }

    fn build_post_patch_message<T: SalesforceObject>(
        &self,
        records: &[T],
        method: RequestMethod,
        all_or_none: bool,
    ) -> Result<Request> {
        let session = self.require_session()?;
        let url = format!("{}{}", session.endpoint(), self.options.collections_path());
        let body = CollectionRequest {
            all_or_none,
            records,
        };
        Ok(Request::new(method, url)
            .json(&body)?
            .authorization(session.authorization()))
    }

    fn build_delete_message<T: SalesforceObject>(
        &self,
        records: &[T],
        all_or_none: bool,
    ) -> Result<Request> {
        let session = self.require_session()?;
        let ids = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record.id().ok_or_else(|| {
                    Error::new(ErrorKind::InvalidRecord(format!(
                        "record at index {} has no id and cannot be deleted",
                        index
                    )))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let url = format!(
            "{}{}?ids={}&allOrNone={}",
            session.endpoint(),
            self.options.collections_path(),
            ids.join(","),
            all_or_none
        );
        Ok(Request::delete(url).authorization(session.authorization()))
    }

    /// Check the status and deserialize the JSON body.
    pub fn process_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        check_status(&response)?;
        response.json().map_err(Into::into)
    }
}

/// Fail with the response body as detail unless the status is 2xx.
pub(crate) fn check_status(response: &Response) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(Error::new(ErrorKind::Http {
        status: response.status(),
        message: response.text_lossy(),
    }))
}

fn login_envelope(username: &str, password: &str) -> String {
    format!(
        concat!(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<s:Body xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">"#,
            r#"<login xmlns="urn:enterprise.soap.sforce.com">"#,
            "<username>{}</username>",
            "<password>{}</password>",
            "</login></s:Body>",
            "</s:Envelope>"
        ),
        quick_xml::escape::escape(username),
        quick_xml::escape::escape(password)
    )
}
