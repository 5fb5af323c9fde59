//! Record query service.
//!
//! Translates [`RecordsApi`] outcomes into a [`QueryResult`]. A not-found
//! answer becomes [`QueryResult::Empty`]; every other failure becomes
//! [`QueryResult::Error`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::{RecordsApi, RecordsApiError};
use crate::domain::{ClientError, QueryFilter, QueryResult, Session};

const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to the backend API";

/// Query service; usable only with an authenticated [`Session`].
#[derive(Clone)]
pub struct QueryClient<R> {
    records: Arc<R>,
}

impl<R> QueryClient<R>
where
    R: RecordsApi,
{
    /// Create a query client over the records port.
    pub fn new(records: Arc<R>) -> Self {
        Self { records }
    }

    /// Run one query. Never fails; failures are folded into the result.
    ///
    /// The session is not sent to the backend; requiring it keeps
    /// unauthenticated callers out.
    pub async fn submit_query(&self, _session: &Session, filter: &QueryFilter) -> QueryResult {
        debug!(query = %filter.to_query_string(), "submitting record query");
        match self.records.query_records(filter).await {
            Ok(records) => {
                debug!(count = records.len(), "query returned records");
                QueryResult::Success(records)
            }
            Err(RecordsApiError::NotFound { .. }) => QueryResult::Empty,
            Err(RecordsApiError::Rejected { status, detail }) => {
                warn!(status, "record query rejected");
                QueryResult::Error(ClientError::server(
                    detail.message_or(format!("Server error: {status}")),
                ))
            }
            Err(error @ (RecordsApiError::Transport { .. } | RecordsApiError::Decode { .. })) => {
                warn!(%error, "record query failed");
                QueryResult::Error(ClientError::connectivity(CONNECT_FAILED_MESSAGE))
            }
        }
    }
}
