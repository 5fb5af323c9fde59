//! Tests for the report submission service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockRecordsApi;
use crate::domain::{
    AuthToken, ErrorDetail, ErrorKind, Impact, LandslideSource, LandslideType,
    REQUIRED_FIELDS_MESSAGE, UserIdentity, Wea13Type,
};

#[fixture]
fn session() -> Session {
    Session::new(
        AuthToken::new("abc123").expect("token"),
        UserIdentity::try_from_parts("u-7", "ada@example.com", "ada").expect("user"),
    )
}

fn prepared_api(max: Option<u64>) -> MockRecordsApi {
    let mut api = MockRecordsApi::new();
    api.expect_max_landslide_id()
        .times(1)
        .return_once(move || Ok(max));
    api
}

fn fill(form: &mut ReportForm) {
    form.capture_click(38.626_349, -97.175_12).expect("click");
    form.ls_type = Some(LandslideType::Debris);
    form.ls_source = Some(LandslideSource::Natural);
    form.impact = Some(Impact::Road);
    form.wea13_type = Some(Wea13Type::None);
}

#[rstest]
#[case(None, "100090")]
#[case(Some(100_120), "100121")]
#[tokio::test]
async fn prepare_proposes_next_identifier(
    session: Session,
    #[case] max: Option<u64>,
    #[case] expected: &str,
) {
    let submitter = ReportSubmitter::new(Arc::new(prepared_api(max)));

    let form = submitter.prepare(&session).await;

    assert_eq!(form.landslide_id().map(LandslideId::as_str), Some(expected));
    assert_eq!(form.user_id(), "u-7");
    assert_eq!(form.status(), &ReportStatus::Idle);
}

#[rstest]
#[tokio::test]
async fn configured_fallback_base_is_used(session: Session) {
    let submitter = ReportSubmitter::with_fallback_base(Arc::new(prepared_api(None)), 500);

    let form = submitter.prepare(&session).await;

    assert_eq!(form.landslide_id().map(LandslideId::as_str), Some("501"));
}

#[rstest]
#[tokio::test]
async fn failed_lookup_marks_form_as_errored(session: Session) {
    let mut api = MockRecordsApi::new();
    api.expect_max_landslide_id()
        .times(1)
        .return_once(|| Err(RecordsApiError::transport("refused")));
    let submitter = ReportSubmitter::new(Arc::new(api));

    let form = submitter.prepare(&session).await;

    assert_eq!(form.landslide_id(), None);
    assert_eq!(
        form.status(),
        &ReportStatus::Error("Failed to generate IDs. Please check backend.".to_owned())
    );
    assert_eq!(form.user_id(), "u-7");
}

#[rstest]
#[tokio::test]
async fn incomplete_form_never_reaches_the_backend(session: Session) {
    let mut api = prepared_api(None);
    api.expect_create_record().times(0);
    let submitter = ReportSubmitter::new(Arc::new(api));
    let mut form = submitter.prepare(&session).await;
    fill(&mut form);
    form.ls_type = None;

    let err = submitter.submit(&session, &mut form).await.expect_err("local");

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.message(), REQUIRED_FIELDS_MESSAGE);
    assert!(form.point().is_some(), "inputs survive a rejected submit");
}

#[rstest]
#[tokio::test]
async fn successful_submit_resets_form_and_advances_identifier(session: Session) {
    let mut api = prepared_api(None);
    api.expect_create_record()
        .times(1)
        .withf(|draft| {
            draft.landslide_id.as_str() == "100090"
                && draft.user_id == "u-7"
                && draft.wea13_type.is_none()
                && (draft.latitude - 38.6263).abs() < 1e-9
        })
        .return_once(|draft| Ok(draft.landslide_id.clone()));
    let submitter = ReportSubmitter::new(Arc::new(api));
    let mut form = submitter.prepare(&session).await;
    fill(&mut form);

    let confirmed = submitter.submit(&session, &mut form).await.expect("created");

    assert_eq!(confirmed.as_str(), "100090");
    assert_eq!(
        form.status(),
        &ReportStatus::Success("Record added successfully! ID: 100090".to_owned())
    );
    assert!(form.point().is_none());
    assert!(form.ls_type.is_none());
    assert_eq!(form.landslide_id().map(LandslideId::as_str), Some("100091"));
}

#[rstest]
#[case::detail(
    RecordsApiError::rejected(422_u16, ErrorDetail::Message("duplicate landslideID".into())),
    ErrorKind::Server,
    "duplicate landslideID"
)]
#[case::no_detail(
    RecordsApiError::rejected(500_u16, ErrorDetail::Missing),
    ErrorKind::Server,
    "Server error: 500"
)]
#[case::network(
    RecordsApiError::transport("reset by peer"),
    ErrorKind::Connectivity,
    "Failed to submit data. Please check network or server."
)]
#[tokio::test]
async fn submit_failures_keep_inputs(
    session: Session,
    #[case] failure: RecordsApiError,
    #[case] kind: ErrorKind,
    #[case] message: &str,
) {
    let mut api = prepared_api(None);
    api.expect_create_record()
        .times(1)
        .return_once(move |_| Err(failure));
    let submitter = ReportSubmitter::new(Arc::new(api));
    let mut form = submitter.prepare(&session).await;
    fill(&mut form);

    let err = submitter.submit(&session, &mut form).await.expect_err("fails");

    assert_eq!(err.kind(), kind);
    assert_eq!(err.message(), message);
    assert_eq!(form.status(), &ReportStatus::Error(message.to_owned()));
    assert!(form.point().is_some());
    assert_eq!(form.landslide_id().map(LandslideId::as_str), Some("100090"));
}
