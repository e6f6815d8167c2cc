use serde::de::DeserializeOwned;
use sfconnect_client::HttpTransport;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::SessionClient;
use crate::error::{Error, ErrorKind, Result};
use crate::types::QueryResult;

impl<T: HttpTransport> SessionClient<T> {
    /// Run a SOQL query and collect every page into one result set.
    ///
    /// The first page's `totalSize` bounds the result: pages delivering more records
    /// than that fail with [`ErrorKind::ResultOverflow`]. A query whose first page is
    /// already complete returns that page's records as they are.
    #[instrument(skip(self, cancel))]
    pub async fn query_data<R: DeserializeOwned>(
        &self,
        soql: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<R>> {
        let mut accumulated: Vec<R> = Vec::new();
        let mut total_size: Option<usize> = None;
        let mut continuation: Option<String> = None;

        loop {
            let request = {
                let builder = self.read_builder()?;
                match &continuation {
                    None => builder.build_query_message(soql, false)?,
                    Some(next) => builder.build_query_message(next, true)?,
                }
            };
            let response = self.send(request, cancel).await?;
            let page: QueryResult<R> = self.read_builder()?.process_response(response)?;

            let total = match total_size {
                Some(total) => total,
                None if page.done => {
                    debug!(records = page.records.len(), "Query completed in one page");
                    return Ok(page.records);
                }
                None => {
                    let total = usize::try_from(page.total_size).map_err(|_| {
                        Error::new(ErrorKind::Other(format!(
                            "query total size {} does not fit in memory",
                            page.total_size
                        )))
                    })?;
                    accumulated.try_reserve_exact(total).map_err(|e| {
                        Error::with_source(
                            ErrorKind::Other(format!(
                                "cannot allocate a buffer for query total size {}",
                                total
                            )),
                            e,
                        )
                    })?;
                    total_size = Some(total);
                    total
                }
            };

            let received = accumulated.len() + page.records.len();
            if received > total {
                return Err(Error::new(ErrorKind::ResultOverflow {
                    total_size: total,
                    received,
                }));
            }
            accumulated.extend(page.records);
            debug!(received, total, "Fetched query page");

            if page.done {
                if accumulated.len() < total {
                    warn!(
                        received = accumulated.len(),
                        total, "Query finished with fewer records than its reported total size"
                    );
                }
                return Ok(accumulated);
            }

            continuation = Some(page.next_records_url.ok_or_else(|| {
                Error::new(ErrorKind::Other(
                    "incomplete query page without nextRecordsUrl".to_string(),
                ))
            })?);
        }
    }
}
