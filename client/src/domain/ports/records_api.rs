//! Driven port for the backend's landslide record endpoints.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{
    ErrorDetail, FilterField, Geometry, LandslideId, QueryFilter, Record, ReportDraft,
};

define_port_error! {
    /// Errors raised by record adapters.
    pub enum RecordsApiError {
        /// The backend reported that nothing matched.
        NotFound { detail: ErrorDetail } => "no records matched: {detail}",
        /// The backend answered with another non-success status.
        Rejected { status: u16, detail: ErrorDetail } => "backend rejected request ({status}): {detail}",
        /// No response was obtained.
        Transport { message: String } => "records transport failed: {message}",
        /// A success response carried an unusable payload.
        Decode { message: String } => "records payload malformed: {message}",
    }
}

/// Port for querying, numbering and creating landslide records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// Fetch records matching `filter`.
    async fn query_records(&self, filter: &QueryFilter) -> Result<Vec<Record>, RecordsApiError>;

    /// Highest numeric identifier the backend knows, if any.
    async fn max_landslide_id(&self) -> Result<Option<u64>, RecordsApiError>;

    /// Store a report and return the identifier the backend confirmed.
    async fn create_record(&self, draft: &ReportDraft) -> Result<LandslideId, RecordsApiError>;
}

/// In-memory record store for demos and tests.
///
/// Queries only honour the landslide identifier filter; every other filter
/// is ignored.
#[derive(Debug, Default)]
pub struct FixtureRecordsApi {
    records: Mutex<Vec<Record>>,
}

impl FixtureRecordsApi {
    /// Seed the fixture with `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Record>>, RecordsApiError> {
        self.records
            .lock()
            .map_err(|err| RecordsApiError::transport(err.to_string()))
    }
}

#[async_trait]
impl RecordsApi for FixtureRecordsApi {
    async fn query_records(&self, filter: &QueryFilter) -> Result<Vec<Record>, RecordsApiError> {
        let wanted = filter.get(FilterField::LandslideId);
        let matches = self
            .lock()?
            .iter()
            .filter(|record| wanted.is_none_or(|id| record.landslide_id == id))
            .cloned()
            .collect::<Vec<_>>();
        if matches.is_empty() {
            return Err(RecordsApiError::not_found(ErrorDetail::Message(
                "No data import records found matching your criteria.".to_owned(),
            )));
        }
        Ok(matches)
    }

    async fn max_landslide_id(&self) -> Result<Option<u64>, RecordsApiError> {
        Ok(self
            .lock()?
            .iter()
            .filter_map(|record| record.landslide_id.parse::<u64>().ok())
            .max())
    }

    async fn create_record(&self, draft: &ReportDraft) -> Result<LandslideId, RecordsApiError> {
        let record = Record {
            landslide_id: draft.landslide_id.as_str().to_owned(),
            latitude: draft.latitude,
            longitude: draft.longitude,
            ls_type: draft.ls_type.as_str().to_owned(),
            ls_source: draft.ls_source.as_str().to_owned(),
            impact: draft.impact.as_str().to_owned(),
            wea13_id: draft.wea13_id.clone(),
            wea13_type: draft.wea13_type.map(|kind| kind.as_str().to_owned()),
            user_id: Some(draft.user_id.clone()),
            geometry: Some(Geometry::Point {
                coordinates: vec![draft.longitude, draft.latitude],
            }),
        };
        self.lock()?.push(record);
        Ok(draft.landslide_id.clone())
    }
}
