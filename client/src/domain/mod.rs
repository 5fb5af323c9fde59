//! Domain model and services for the landslide reporting client.
//!
//! Purpose: hold every rule the client enforces without reference to HTTP
//! or the filesystem. Adapters in `outbound` implement the traits in
//! [`ports`]; the services here are generic over those traits.
//!
//! Public surface:
//! - [`AuthGateway`] gates everything else and owns the session store.
//! - [`QueryClient`] and [`ReportSubmitter`] require a [`Session`] argument,
//!   so they cannot be reached without signing in first.
//! - [`ClientError`] is the only error type services return.

pub mod auth;
pub mod auth_gateway;
pub mod error;
pub mod error_detail;
pub mod ports;
pub mod query;
pub mod query_client;
pub mod record;
pub mod report;
pub mod report_submitter;
pub mod session;

pub use self::auth::{AuthValidationError, SignInCredentials, SignUpRequest};
pub use self::auth_gateway::{
    AUTO_LOGIN_FAILED_MESSAGE, AuthGateway, AuthRequestState, AuthState, Notice,
    SIGNED_IN_MESSAGE, SIGNED_OUT_MESSAGE, SIGNED_UP_MESSAGE, SignUpOutcome,
};
pub use self::error::{ClientError, ErrorKind};
pub use self::error_detail::{ErrorDetail, FieldError};
pub use self::query::{
    FilterField, NO_MATCHING_RECORDS_MESSAGE, NO_RECORDS_MESSAGE, ParseFilterFieldError,
    QueryFilter, QueryResult,
};
pub use self::query_client::QueryClient;
pub use self::record::{Geometry, Position, Record, records_to_feature_collection};
pub use self::report::{
    FALLBACK_LANDSLIDE_ID_BASE, Impact, LandslideId, LandslideSource, LandslideType,
    MISSING_ID_MESSAGE, MapPoint, ParseCategoryError, REQUIRED_FIELDS_MESSAGE, ReportDraft,
    ReportForm, ReportStatus, Wea13Type,
};
pub use self::report_submitter::ReportSubmitter;
pub use self::session::{AuthToken, Session, SessionValidationError, UserIdentity};
