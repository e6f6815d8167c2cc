//! Session lifecycle orchestration over an [`HttpTransport`].

mod modify;
mod query;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use sfconnect_client::{HttpTransport, Request, Response, SfHttpClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::message::{check_status, MessageBuilder};
use crate::options::ConnectorOptions;

/// Session-aware Salesforce client.
///
/// Owns a transport and a [`MessageBuilder`]. Every operation takes a
/// [`CancellationToken`] that is raced against each network call.
///
/// Only [`log_in`](Self::log_in) is guarded against concurrent use; a login that
/// completes while a query or modification is running may change the session
/// between its pages or chunks.
///
/// # Example
///
/// ```rust,ignore
/// use sfconnect_session::{CancellationToken, ConnectorOptions, SessionClient};
///
/// let client = SessionClient::new(ConnectorOptions::from_env()?)?;
/// let cancel = CancellationToken::new();
///
/// client.log_in(&cancel).await?;
/// let accounts: Vec<serde_json::Value> = client
///     .query_data("SELECT Id, Name FROM Account", &cancel)
///     .await?;
/// client.log_out(&cancel).await?;
/// ```
pub struct SessionClient<T: HttpTransport = SfHttpClient> {
    transport: T,
    builder: RwLock<MessageBuilder>,
    logins_in_flight: AtomicUsize,
}

impl<T: HttpTransport> std::fmt::Debug for SessionClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("builder", &self.builder)
            .field(
                "logins_in_flight",
                &self.logins_in_flight.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}

impl SessionClient<SfHttpClient> {
    /// Create a client that sends through the process-wide [`SfHttpClient`].
    pub fn new(options: ConnectorOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::with_transport(options, SfHttpClient::shared()?))
    }
}

impl<T: HttpTransport> SessionClient<T> {
    /// Create a client over a caller-supplied transport.
    pub fn with_transport(options: ConnectorOptions, transport: T) -> Self {
        Self {
            transport,
            builder: RwLock::new(MessageBuilder::new(options)),
            logins_in_flight: AtomicUsize::new(0),
        }
    }

    /// Whether a login has succeeded on this client.
    pub fn is_logged_in(&self) -> bool {
        self.read_builder()
            .map(|builder| builder.is_authenticated())
            .unwrap_or(false)
    }

    /// Log in with the configured credentials and store the new session.
    ///
    /// At most one login runs per client; a concurrent call fails immediately with
    /// [`ErrorKind::LoginInProgress`]. Cancellation returns `Ok(())` and leaves the
    /// session untouched.
    #[instrument(skip(self, cancel))]
    pub async fn log_in(&self, cancel: &CancellationToken) -> Result<()> {
        let guard = LoginGuard::acquire(&self.logins_in_flight);
        if guard.contended {
            return Err(Error::new(ErrorKind::LoginInProgress));
        }

        let request = self.read_builder()?.build_login_message();
        let response = match self.send(request, cancel).await {
            Err(e) if e.is_cancelled() => {
                debug!("Login cancelled");
                return Ok(());
            }
            result => result?,
        };

        self.write_builder()?.process_login_response(response)?;
        info!("Logged in");
        Ok(())
    }

    /// Revoke the current session token.
    ///
    /// The local session is kept; authenticated calls made afterwards are rejected
    /// by the server. Cancellation returns `Ok(())`.
    #[instrument(skip(self, cancel))]
    pub async fn log_out(&self, cancel: &CancellationToken) -> Result<()> {
        let request = self.read_builder()?.build_logout_message()?;
        let response = match self.send(request, cancel).await {
            Err(e) if e.is_cancelled() => {
                debug!("Logout cancelled");
                return Ok(());
            }
            result => result?,
        };

        check_status(&response)?;
        info!("Logged out");
        Ok(())
    }

    async fn send(&self, request: Request, cancel: &CancellationToken) -> Result<Response> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::new(ErrorKind::Cancelled)),
            result = self.transport.send(request) => result.map_err(Into::into),
        }
    }

    fn read_builder(&self) -> Result<RwLockReadGuard<'_, MessageBuilder>> {
        self.builder.read().map_err(|_| poisoned())
    }

    fn write_builder(&self) -> Result<RwLockWriteGuard<'_, MessageBuilder>> {
        self.builder.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> Error {
    Error::new(ErrorKind::Other("session state lock poisoned".to_string()))
}

/// Holds one slot of the login counter; released on drop.
struct LoginGuard<'a> {
    counter: &'a AtomicUsize,
    contended: bool,
}

impl<'a> LoginGuard<'a> {
    fn acquire(counter: &'a AtomicUsize) -> Self {
        let previous = counter.fetch_add(1, Ordering::AcqRel);
        Self {
            counter,
            contended: previous != 0,
        }
    }
}

impl Drop for LoginGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
    }
}
