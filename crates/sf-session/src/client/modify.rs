use sfconnect_client::HttpTransport;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::SessionClient;
use crate::error::Result;
use crate::types::{DataModificationResult, DataModificationType, SalesforceObject};

impl<T: HttpTransport> SessionClient<T> {
    /// Insert, update or delete records through the sObject Collections endpoint.
    ///
    /// Records are sent in chunks of at most [`batch_size`](crate::ConnectorOptions::batch_size),
    /// one chunk at a time and in input order. Results are returned in the same order.
    /// The first failing chunk aborts the call; chunks already sent stay applied.
    #[instrument(skip(self, records, cancel), fields(records = records.len()))]
    pub async fn modify_data<R: SalesforceObject>(
        &self,
        records: &[R],
        operation: DataModificationType,
        all_or_none: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<DataModificationResult>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = self.read_builder()?.options().batch_size();
        let method = operation.method();
        let mut results = Vec::with_capacity(records.len());

        for (index, chunk) in records.chunks(batch_size).enumerate() {
            let request = self
                .read_builder()?
                .build_data_change_message(chunk, method, all_or_none)?;
            debug!(chunk = index, size = chunk.len(), "Sending collections request");

            let response = self.send(request, cancel).await?;
            let chunk_results: Vec<DataModificationResult> =
                self.read_builder()?.process_response(response)?;
            results.extend(chunk_results);
        }

        log_summary(operation, &results);
        Ok(results)
    }

    /// [`modify_data`](Self::modify_data) with the configured `allOrNone` default.
    pub async fn modify_data_default<R: SalesforceObject>(
        &self,
        records: &[R],
        operation: DataModificationType,
        cancel: &CancellationToken,
    ) -> Result<Vec<DataModificationResult>> {
        let all_or_none = self.read_builder()?.options().all_or_none();
        self.modify_data(records, operation, all_or_none, cancel)
            .await
    }
}

fn log_summary(operation: DataModificationType, results: &[DataModificationResult]) {
    let failed = results.iter().filter(|result| !result.success).count();
    info!(
        %operation,
        total = results.len(),
        succeeded = results.len() - failed,
        failed,
        "Data modification finished"
    );

    for (index, result) in results.iter().enumerate() {
        if result.success {
            continue;
        }
        for error in &result.errors {
            debug!(
                index,
                id = ?result.id,
                status_code = %error.status_code,
                message = %error.message,
                fields = ?error.fields,
                "Record failed"
            );
        }
    }
}
