//! Scripted transport double for session client tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use sfconnect_client::{HttpTransport, Request, Response};
use tokio::sync::Notify;

/// Replays canned responses in order and records every request it receives.
///
/// When gated, each call signals `entered` and then waits on `release` before
/// answering. An exhausted script answers with a transport error.
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Response>>,
    requests: Mutex<Vec<Request>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: impl IntoIterator<Item = Response>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub(crate) fn gated(
        responses: impl IntoIterator<Item = Response>,
        entered: Arc<Notify>,
        release: Arc<Notify>,
    ) -> Self {
        Self {
            gate: Some((entered, release)),
            ..Self::new(responses)
        }
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: Request) -> sfconnect_client::Result<Response> {
        self.requests.lock().unwrap().push(request);
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.ok_or_else(|| {
            sfconnect_client::Error::new(sfconnect_client::ErrorKind::Connection(
                "no scripted response left".to_string(),
            ))
        })
    }
}

/// A 200 login response carrying `token` and the `https://acme.my.salesforce.com` endpoint.
pub(crate) fn login_response(token: &str) -> Response {
    Response::from_status(
        200,
        format!(
            "<loginResponse><result><serverUrl>https://acme.my.salesforce.com/services/Soap/c/49.0/00Dxx</serverUrl><sessionId>{}</sessionId></result></loginResponse>",
            token
        ),
    )
}

pub(crate) fn json_response(status: u16, body: Value) -> Response {
    Response::from_status(status, body.to_string())
}
