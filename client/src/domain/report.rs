//! Report form state and the validated draft sent to the backend.
//!
//! A [`ReportForm`] mirrors what the person filling in a report sees: a
//! proposed identifier, the signed-in user, one staged map point and the
//! categorical selections. [`ReportForm::to_draft`] is the only way to obtain
//! a [`ReportDraft`], so a draft always satisfies the required-field rules.

use std::fmt;
use std::str::FromStr;

use super::ClientError;

/// Base used when the backend knows no prior identifier.
pub const FALLBACK_LANDSLIDE_ID_BASE: u64 = 100_089;

/// Prompt shown when a required field or the map point is missing.
pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Please fill in all required fields (including map click).";

/// Prompt shown when submitting before an identifier was proposed.
pub const MISSING_ID_MESSAGE: &str = "Landslide ID has not been generated yet.";

/// Sentinel used by the wea13 fields to mean "no classification".
const WEA13_SENTINEL: &str = "None";

/// Parse error for the categorical report fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError {
    /// Field being parsed.
    pub field: &'static str,
    /// Rejected input.
    pub input: String,
}

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.field, self.input)
    }
}

impl std::error::Error for ParseCategoryError {}

macro_rules! categorical {
    (
        $(#[$outer:meta])*
        $name:ident ($field:literal) {
            $( $(#[$variant_meta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant, )+
        }

        impl $name {
            /// Every option, in the order the form lists them.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Label sent to and received from the backend.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseCategoryError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str().eq_ignore_ascii_case(value.trim()))
                    .ok_or_else(|| ParseCategoryError {
                        field: $field,
                        input: value.to_owned(),
                    })
            }
        }
    };
}

categorical! {
    /// Landslide movement type.
    LandslideType("landslide type") {
        /// Debris slide.
        Debris => "Debris",
        /// Flow.
        Flow => "Flow",
        /// Rock fall or slide.
        Rock => "Rock",
        /// Lateral movement.
        Lateral => "Lateral",
        /// Coherent block movement.
        Coherent => "Coherent",
    }
}

categorical! {
    /// Whether the slope was natural or modified.
    LandslideSource("landslide source") {
        /// Natural slope.
        Natural => "Natural",
        /// Modified slope, e.g. a road cut.
        Modified => "Modified",
    }
}

categorical! {
    /// Observed impact.
    Impact("impact") {
        /// No impact.
        None => "None",
        /// Road damage.
        Road => "Road",
        /// Economic loss.
        Econ => "Econ",
        /// Structural damage.
        Structure => "Structure",
    }
}

categorical! {
    /// Secondary (wea13) classification type.
    Wea13Type("wea13 type") {
        /// Coherent slide.
        Coherent => "Coherent",
        /// Lateral spread.
        LateralSpread => "Lateral Spread",
        /// Disrupted slide.
        Disrupted => "Disrupted",
        /// Sentinel persisted as `null`.
        None => "None",
    }
}

/// Identifier proposed for, or confirmed by, the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LandslideId(String);

impl LandslideId {
    /// Wrap an identifier received from the backend.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Propose the identifier following `max`, or `fallback_base + 1`.
    ///
    /// # Examples
    /// ```
    /// use landslide_client::domain::{FALLBACK_LANDSLIDE_ID_BASE, LandslideId};
    ///
    /// let id = LandslideId::next_after(None, FALLBACK_LANDSLIDE_ID_BASE);
    /// assert_eq!(id.as_str(), "100090");
    /// ```
    pub fn next_after(max: Option<u64>, fallback_base: u64) -> Self {
        let next = max.unwrap_or(fallback_base).saturating_add(1);
        Self(next.to_string())
    }

    /// Identifier after this one, when this one is numeric.
    pub fn successor(&self) -> Option<Self> {
        self.0
            .trim()
            .parse::<u64>()
            .ok()
            .map(|id| Self::next_after(Some(id), FALLBACK_LANDSLIDE_ID_BASE))
    }

    /// Identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LandslideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point staged by a map click, kept as the strings shown in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPoint {
    latitude: String,
    longitude: String,
}

impl MapPoint {
    /// Round a click to four decimal places.
    ///
    /// Returns `None` for non-finite input.
    pub fn from_click(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some(Self {
            latitude: format!("{latitude:.4}"),
            longitude: format!("{longitude:.4}"),
        })
    }

    /// Latitude as displayed.
    pub fn latitude(&self) -> &str {
        self.latitude.as_str()
    }

    /// Longitude as displayed.
    pub fn longitude(&self) -> &str {
        self.longitude.as_str()
    }
}

/// Progress of the report form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportStatus {
    /// Ready for input.
    #[default]
    Idle,
    /// The identifier lookup is running.
    GeneratingIds,
    /// A submission is in flight.
    Submitting,
    /// The last submission succeeded.
    Success(String),
    /// The last lookup or submission failed.
    Error(String),
}

/// Mutable report form state.
///
/// Categorical selections are public; the identifier, user, map point and
/// status are managed by the form and the report submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportForm {
    landslide_id: Option<LandslideId>,
    user_id: String,
    point: Option<MapPoint>,
    status: ReportStatus,
    /// Selected landslide type.
    pub ls_type: Option<LandslideType>,
    /// Selected landslide source.
    pub ls_source: Option<LandslideSource>,
    /// Selected impact.
    pub impact: Option<Impact>,
    /// Selected wea13 type; required.
    pub wea13_type: Option<Wea13Type>,
    /// Optional free-text wea13 identifier.
    pub wea13_id: String,
}

impl ReportForm {
    /// Empty form for `user_id` with no identifier proposed yet.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            landslide_id: None,
            user_id: user_id.into(),
            point: None,
            status: ReportStatus::Idle,
            ls_type: None,
            ls_source: None,
            impact: None,
            wea13_type: None,
            wea13_id: String::new(),
        }
    }

    /// Stage a map click, replacing any earlier point.
    pub fn capture_click(
        &mut self,
        latitude: f64,
        longitude: f64,
    ) -> Result<&MapPoint, ClientError> {
        let point = MapPoint::from_click(latitude, longitude)
            .ok_or_else(|| ClientError::validation(REQUIRED_FIELDS_MESSAGE))?;
        Ok(&*self.point.insert(point))
    }

    /// Validate the form into a draft ready to send.
    ///
    /// Required fields are checked before the identifier, so an incomplete
    /// form always reports the required-fields prompt.
    pub fn to_draft(&self) -> Result<ReportDraft, ClientError> {
        let required = || ClientError::validation(REQUIRED_FIELDS_MESSAGE);
        let (Some(point), Some(ls_type), Some(ls_source), Some(impact), Some(wea13_type)) = (
            self.point.as_ref(),
            self.ls_type,
            self.ls_source,
            self.impact,
            self.wea13_type,
        ) else {
            return Err(required());
        };
        let latitude = point.latitude.parse::<f64>().map_err(|_| required())?;
        let longitude = point.longitude.parse::<f64>().map_err(|_| required())?;
        let landslide_id = self
            .landslide_id
            .clone()
            .ok_or_else(|| ClientError::validation(MISSING_ID_MESSAGE))?;

        Ok(ReportDraft {
            landslide_id,
            latitude,
            longitude,
            ls_type,
            ls_source,
            impact,
            wea13_id: normalise_wea13_id(&self.wea13_id),
            wea13_type: (wea13_type != Wea13Type::None).then_some(wea13_type),
            user_id: self.user_id.clone(),
        })
    }

    /// Clear every user-entered field and the staged point.
    pub fn reset(&mut self) {
        self.point = None;
        self.ls_type = None;
        self.ls_source = None;
        self.impact = None;
        self.wea13_type = None;
        self.wea13_id.clear();
    }

    /// Proposed identifier, once generated.
    pub fn landslide_id(&self) -> Option<&LandslideId> {
        self.landslide_id.as_ref()
    }

    /// Replace the proposed identifier.
    pub fn set_landslide_id(&mut self, id: Option<LandslideId>) {
        self.landslide_id = id;
    }

    /// Reporting user.
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Staged map point.
    pub fn point(&self) -> Option<&MapPoint> {
        self.point.as_ref()
    }

    /// Current status.
    pub fn status(&self) -> &ReportStatus {
        &self.status
    }

    pub(crate) fn set_status(&mut self, status: ReportStatus) {
        self.status = status;
    }
}

fn normalise_wea13_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == WEA13_SENTINEL {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Validated report ready for the create endpoint.
///
/// `wea13_type` and `wea13_id` are `None` where the backend should store
/// `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    /// Proposed identifier.
    pub landslide_id: LandslideId,
    /// Latitude parsed from the staged point.
    pub latitude: f64,
    /// Longitude parsed from the staged point.
    pub longitude: f64,
    /// Landslide type.
    pub ls_type: LandslideType,
    /// Landslide source.
    pub ls_source: LandslideSource,
    /// Impact.
    pub impact: Impact,
    /// Secondary classification identifier.
    pub wea13_id: Option<String>,
    /// Secondary classification type; never the sentinel.
    pub wea13_type: Option<Wea13Type>,
    /// Reporting user.
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    //! Form validation, click capture and identifier coverage.

    use super::*;
    use crate::domain::ErrorKind;
    use rstest::{fixture, rstest};

    #[fixture]
    fn complete_form() -> ReportForm {
        let mut form = ReportForm::new("u-1");
        form.set_landslide_id(Some(LandslideId::new("100090")));
        form.capture_click(38.626_349, -97.175_12).expect("finite click");
        form.ls_type = Some(LandslideType::Debris);
        form.ls_source = Some(LandslideSource::Natural);
        form.impact = Some(Impact::Road);
        form.wea13_type = Some(Wea13Type::Coherent);
        form
    }

    #[rstest]
    #[case(None, "100090")]
    #[case(Some(100_100), "100101")]
    #[case(Some(0), "1")]
    fn next_identifier_follows_max_or_fallback(#[case] max: Option<u64>, #[case] expected: &str) {
        let id = LandslideId::next_after(max, FALLBACK_LANDSLIDE_ID_BASE);
        assert_eq!(id.as_str(), expected);
    }

    #[rstest]
    #[case("100095", Some("100096"))]
    #[case("abc", None)]
    fn successor_requires_numeric_id(#[case] raw: &str, #[case] expected: Option<&str>) {
        let next = LandslideId::new(raw).successor();
        assert_eq!(next.as_ref().map(LandslideId::as_str), expected);
    }

    #[test]
    fn clicks_round_to_four_digits_and_replace_previous_point() {
        let mut form = ReportForm::new("u-1");
        form.capture_click(1.0, 2.0).expect("first click");
        let point = form.capture_click(38.626_349, -97.175_18).expect("second click");
        assert_eq!(point.latitude(), "38.6263");
        assert_eq!(point.longitude(), "-97.1752");
        assert_eq!(form.point().map(MapPoint::latitude), Some("38.6263"));
    }

    #[test]
    fn non_finite_clicks_are_rejected() {
        let mut form = ReportForm::new("u-1");
        let err = form.capture_click(f64::NAN, 0.0).expect_err("nan");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(form.point().is_none());
    }

    #[rstest]
    fn complete_form_builds_a_draft(complete_form: ReportForm) {
        let draft = complete_form.to_draft().expect("draft");
        assert_eq!(draft.landslide_id.as_str(), "100090");
        assert!((draft.latitude - 38.6263).abs() < f64::EPSILON);
        assert!((draft.longitude - -97.1751).abs() < f64::EPSILON);
        assert_eq!(draft.wea13_type, Some(Wea13Type::Coherent));
        assert_eq!(draft.wea13_id, None);
        assert_eq!(draft.user_id, "u-1");
    }

    #[rstest]
    fn missing_type_is_rejected_locally(mut complete_form: ReportForm) {
        complete_form.ls_type = None;
        let err = complete_form.to_draft().expect_err("incomplete");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), REQUIRED_FIELDS_MESSAGE);
    }

    #[test]
    fn required_fields_are_checked_before_the_identifier() {
        let form = ReportForm::new("u-1");
        let err = form.to_draft().expect_err("empty form");
        assert_eq!(err.message(), REQUIRED_FIELDS_MESSAGE);
    }

    #[rstest]
    fn missing_identifier_is_reported_once_fields_are_complete(mut complete_form: ReportForm) {
        complete_form.set_landslide_id(None);
        let err = complete_form.to_draft().expect_err("no id");
        assert_eq!(err.message(), MISSING_ID_MESSAGE);
    }

    #[rstest]
    #[case(Wea13Type::None, "", None, None)]
    #[case(Wea13Type::None, "17", None, Some("17"))]
    #[case(Wea13Type::Disrupted, "None", Some(Wea13Type::Disrupted), None)]
    #[case(Wea13Type::LateralSpread, " 4 ", Some(Wea13Type::LateralSpread), Some("4"))]
    fn wea13_fields_are_normalised_independently(
        mut complete_form: ReportForm,
        #[case] wea13_type: Wea13Type,
        #[case] wea13_id: &str,
        #[case] expected_type: Option<Wea13Type>,
        #[case] expected_id: Option<&str>,
    ) {
        complete_form.wea13_type = Some(wea13_type);
        complete_form.wea13_id = wea13_id.to_owned();
        let draft = complete_form.to_draft().expect("draft");
        assert_eq!(draft.wea13_type, expected_type);
        assert_eq!(draft.wea13_id.as_deref(), expected_id);
    }

    #[rstest]
    fn reset_clears_inputs_but_keeps_identity(mut complete_form: ReportForm) {
        complete_form.wea13_id = "9".to_owned();
        complete_form.reset();
        assert!(complete_form.point().is_none());
        assert!(complete_form.ls_type.is_none());
        assert!(complete_form.wea13_id.is_empty());
        assert_eq!(complete_form.user_id(), "u-1");
        assert!(complete_form.landslide_id().is_some());
    }

    #[rstest]
    #[case("lateral spread", Wea13Type::LateralSpread)]
    #[case("None", Wea13Type::None)]
    fn categories_parse_their_labels(#[case] raw: &str, #[case] expected: Wea13Type) {
        assert_eq!(raw.parse::<Wea13Type>(), Ok(expected));
    }

    #[test]
    fn unknown_category_names_the_field() {
        let err = "Mud".parse::<LandslideType>().expect_err("unknown");
        assert_eq!(err.to_string(), "unknown landslide type: Mud");
    }
}
