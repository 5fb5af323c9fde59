//! Report submission service.
//!
//! [`ReportSubmitter::prepare`] builds a form for the signed-in user and
//! proposes the next identifier. [`ReportSubmitter::submit`] validates the
//! form locally, then creates the record. Failures are recorded on the form
//! as [`ReportStatus::Error`] and returned as [`ClientError`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{RecordsApi, RecordsApiError};
use crate::domain::{
    ClientError, FALLBACK_LANDSLIDE_ID_BASE, LandslideId, ReportForm, ReportStatus, Session,
};

const ID_LOOKUP_FAILED_MESSAGE: &str = "Failed to generate IDs. Please check backend.";
const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit data. Please check network or server.";

/// Report service; usable only with an authenticated [`Session`].
#[derive(Clone)]
pub struct ReportSubmitter<R> {
    records: Arc<R>,
    fallback_base: u64,
}

impl<R> ReportSubmitter<R>
where
    R: RecordsApi,
{
    /// Create a submitter using the default fallback identifier base.
    pub fn new(records: Arc<R>) -> Self {
        Self::with_fallback_base(records, FALLBACK_LANDSLIDE_ID_BASE)
    }

    /// Create a submitter that proposes `fallback_base + 1` when the backend
    /// knows no identifier.
    pub fn with_fallback_base(records: Arc<R>, fallback_base: u64) -> Self {
        Self {
            records,
            fallback_base,
        }
    }

    /// Build a form for the session's user and propose an identifier.
    ///
    /// The user identifier comes from the session without a network call.
    pub async fn prepare(&self, session: &Session) -> ReportForm {
        let mut form = ReportForm::new(session.user().id());
        self.propose_id(&mut form).await;
        form
    }

    /// Ask the backend for its highest identifier and propose the next one.
    ///
    /// A failed lookup clears the proposal and leaves the form in the error
    /// state; calling this again retries.
    pub async fn propose_id(&self, form: &mut ReportForm) {
        form.set_status(ReportStatus::GeneratingIds);
        match self.records.max_landslide_id().await {
            Ok(max) => {
                let id = LandslideId::next_after(max, self.fallback_base);
                info!(landslide_id = %id, "proposed landslide id");
                form.set_landslide_id(Some(id));
                form.set_status(ReportStatus::Idle);
            }
            Err(error) => {
                warn!(%error, "landslide id lookup failed");
                form.set_landslide_id(None);
                form.set_status(ReportStatus::Error(ID_LOOKUP_FAILED_MESSAGE.to_owned()));
            }
        }
    }

    /// Validate and submit `form`.
    ///
    /// Validation failures never reach the backend. On success the form is
    /// reset and the next identifier is proposed; on failure it keeps its
    /// inputs so the user can retry.
    pub async fn submit(
        &self,
        _session: &Session,
        form: &mut ReportForm,
    ) -> Result<LandslideId, ClientError> {
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(error) => {
                form.set_status(ReportStatus::Error(error.message().to_owned()));
                return Err(error);
            }
        };

        form.set_status(ReportStatus::Submitting);
        match self.records.create_record(&draft).await {
            Ok(confirmed) => {
                info!(landslide_id = %confirmed, "report created");
                form.reset();
                form.set_landslide_id(
                    confirmed
                        .successor()
                        .or_else(|| draft.landslide_id.successor()),
                );
                form.set_status(ReportStatus::Success(format!(
                    "Record added successfully! ID: {confirmed}"
                )));
                Ok(confirmed)
            }
            Err(failure) => {
                warn!(error = %failure, "report submission failed");
                let error = map_submit_error(failure);
                form.set_status(ReportStatus::Error(error.message().to_owned()));
                Err(error)
            }
        }
    }
}

fn map_submit_error(error: RecordsApiError) -> ClientError {
    match error {
        RecordsApiError::NotFound { detail } => {
            ClientError::server(detail.message_or("Server error: 404"))
        }
        RecordsApiError::Rejected { status, detail } => {
            ClientError::server(detail.message_or(format!("Server error: {status}")))
        }
        RecordsApiError::Transport { .. } | RecordsApiError::Decode { .. } => {
            ClientError::connectivity(SUBMIT_FAILED_MESSAGE)
        }
    }
}

#[cfg(test)]
#[path = "report_submitter_tests.rs"]
mod tests;
