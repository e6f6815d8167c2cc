//! The transport seam between message building and the network.

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::request::Request;
use crate::response::Response;

/// Sends a [`Request`] and returns the buffered [`Response`].
///
/// Non-success status codes are returned as responses, not errors; only
/// failures that prevent a response from arriving surface as `Err`.
/// Dropping the returned future aborts the call.
pub trait HttpTransport: Send + Sync {
    /// Send a request.
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: HttpTransport> HttpTransport for Arc<T> {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).send(request)
    }
}
