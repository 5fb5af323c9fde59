//! Record query filters and the tri-state query result.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{ClientError, Record};

/// Message shown when a query matched nothing.
pub const NO_RECORDS_MESSAGE: &str = "No records found.";
/// Message reported by [`QueryResult::message`] for [`QueryResult::Empty`].
pub const NO_MATCHING_RECORDS_MESSAGE: &str = "No records found matching your criteria.";

/// Named filters accepted by the query endpoint.
///
/// Declaration order is the order fields appear in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    /// Exact landslide identifier.
    LandslideId,
    /// Inclusive lower latitude bound.
    MinLatitude,
    /// Inclusive upper latitude bound.
    MaxLatitude,
    /// Inclusive lower longitude bound.
    MinLongitude,
    /// Inclusive upper longitude bound.
    MaxLongitude,
    /// Landslide type.
    LandslideType,
    /// Landslide source.
    LandslideSource,
    /// Impact classification.
    Impact,
    /// Secondary classification identifier.
    Wea13Id,
    /// Secondary classification type.
    Wea13Type,
    /// Exact point as `"lon lat"` free text.
    Coordinates,
}

impl FilterField {
    /// Every field, in query-string order.
    pub const ALL: [Self; 11] = [
        Self::LandslideId,
        Self::MinLatitude,
        Self::MaxLatitude,
        Self::MinLongitude,
        Self::MaxLongitude,
        Self::LandslideType,
        Self::LandslideSource,
        Self::Impact,
        Self::Wea13Id,
        Self::Wea13Type,
        Self::Coordinates,
    ];

    /// Query-string parameter name understood by the backend.
    pub fn query_key(self) -> &'static str {
        match self {
            Self::LandslideId => "search_landslideid",
            Self::MinLatitude => "min_latitude",
            Self::MaxLatitude => "max_latitude",
            Self::MinLongitude => "min_longitude",
            Self::MaxLongitude => "max_longitude",
            Self::LandslideType => "landslide_type",
            Self::LandslideSource => "landslide_source",
            Self::Impact => "impact",
            Self::Wea13Id => "wea13_id",
            Self::Wea13Type => "wea13_type",
            Self::Coordinates => "coordinates",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_key())
    }
}

/// Parse error for [`FilterField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterFieldError {
    /// Rejected input.
    pub input: String,
}

impl fmt::Display for ParseFilterFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown query filter: {}", self.input)
    }
}

impl std::error::Error for ParseFilterFieldError {}

impl FromStr for FilterField {
    type Err = ParseFilterFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.query_key() == value)
            .ok_or_else(|| ParseFilterFieldError {
                input: value.to_owned(),
            })
    }
}

/// Optional filter values keyed by [`FilterField`].
///
/// ## Invariants
/// - Stored values are never empty; setting `""` removes the field instead,
///   so it is omitted from the request.
/// - Non-empty values are kept verbatim, whitespace included.
///
/// # Examples
/// ```
/// use landslide_client::domain::{FilterField, QueryFilter};
///
/// let filter = QueryFilter::default()
///     .with(FilterField::LandslideType, "Debris")
///     .with(FilterField::Impact, "");
/// assert_eq!(filter.to_query_string(), "landslide_type=Debris");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    values: BTreeMap<FilterField, String>,
}

impl QueryFilter {
    /// Set or clear one field.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let raw = value.into();
        if raw.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, raw);
        }
    }

    /// Builder form of [`QueryFilter::set`].
    #[must_use]
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Value currently set for `field`.
    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field is populated.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Populated fields as `(parameter, value)` pairs in canonical order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (field.query_key(), value.as_str()))
            .collect()
    }

    /// Canonical `application/x-www-form-urlencoded` query string.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }
}

/// Outcome of a record query.
///
/// `Success(vec![])` and `Empty` both mean "nothing to show"; they are kept
/// apart because only the backend's not-found response produces `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// The backend answered with a list, possibly empty.
    Success(Vec<Record>),
    /// The backend reported that no record matched.
    Empty,
    /// The query failed.
    Error(ClientError),
}

impl QueryResult {
    /// Records to render; empty unless the query succeeded.
    pub fn records(&self) -> &[Record] {
        match self {
            Self::Success(records) => records,
            Self::Empty | Self::Error(_) => &[],
        }
    }

    /// Whether the result should render as "no records".
    pub fn has_no_records(&self) -> bool {
        match self {
            Self::Success(records) => records.is_empty(),
            Self::Empty => true,
            Self::Error(_) => false,
        }
    }

    /// Outcome message: the fixed no-match text for `Empty`, the failure
    /// text for `Error`, nothing for `Success`.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Empty => Some(NO_MATCHING_RECORDS_MESSAGE),
            Self::Error(error) => Some(error.message()),
        }
    }

    /// Status line shown above the result list, if any.
    ///
    /// `Empty` and `Success(vec![])` share the same line.
    pub fn summary(&self) -> Option<String> {
        match self {
            Self::Error(error) => Some(error.message().to_owned()),
            _ if self.has_no_records() => Some(NO_RECORDS_MESSAGE.to_owned()),
            Self::Success(_) | Self::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Filter canonicalisation and result rendering coverage.

    use super::*;
    use rstest::rstest;

    #[test]
    fn single_field_yields_single_pair() {
        let filter = QueryFilter::default().with(FilterField::LandslideType, "Debris");
        assert_eq!(filter.to_query_string(), "landslide_type=Debris");
    }

    #[test]
    fn empty_filter_yields_empty_query_string() {
        assert_eq!(QueryFilter::default().to_query_string(), "");
    }

    #[test]
    fn empty_values_clear_fields() {
        let mut filter = QueryFilter::default().with(FilterField::Impact, "Road");
        filter.set(FilterField::Impact, "");
        assert!(filter.is_empty());
        assert_eq!(filter.get(FilterField::Impact), None);
    }

    #[rstest]
    #[case::spaces("   ", "impact=+++")]
    #[case::padded(" Road ", "impact=+Road+")]
    fn whitespace_values_are_sent_literally(#[case] value: &str, #[case] expected: &str) {
        let filter = QueryFilter::default().with(FilterField::Impact, value);
        assert_eq!(filter.get(FilterField::Impact), Some(value));
        assert_eq!(filter.to_query_string(), expected);
    }

    #[test]
    fn every_combination_omits_empty_fields_and_keeps_set_ones_once() {
        for mask in 0_u32..(1 << FilterField::ALL.len()) {
            let mut filter = QueryFilter::default();
            for (index, field) in FilterField::ALL.into_iter().enumerate() {
                let value = if mask & (1 << index) == 0 {
                    String::new()
                } else {
                    format!("v {index}")
                };
                filter.set(field, value);
            }

            let query = filter.to_query_string();
            let decoded = url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect::<Vec<_>>();

            for (index, field) in FilterField::ALL.into_iter().enumerate() {
                let hits = decoded
                    .iter()
                    .filter(|(key, _)| key == field.query_key())
                    .collect::<Vec<_>>();
                if mask & (1 << index) == 0 {
                    assert!(hits.is_empty(), "{field} must be omitted for mask {mask:#b}");
                } else {
                    assert_eq!(hits.len(), 1, "{field} must appear once for mask {mask:#b}");
                    assert_eq!(hits[0].1, format!("v {index}"));
                }
            }
        }
    }

    #[test]
    fn pairs_follow_canonical_order_regardless_of_insertion() {
        let filter = QueryFilter::default()
            .with(FilterField::Coordinates, "-97.1751 38.6263")
            .with(FilterField::LandslideId, "100090");
        assert_eq!(
            filter.to_query_pairs(),
            vec![
                ("search_landslideid", "100090"),
                ("coordinates", "-97.1751 38.6263")
            ]
        );
    }

    #[test]
    fn filter_fields_round_trip_through_their_keys() {
        assert_eq!("wea13_type".parse(), Ok(FilterField::Wea13Type));
        assert!("lsType".parse::<FilterField>().is_err());
    }

    #[test]
    fn not_found_and_empty_success_render_identically() {
        let empty = QueryResult::Empty;
        let success = QueryResult::Success(Vec::new());

        assert_ne!(empty, success);
        assert!(empty.has_no_records() && success.has_no_records());
        assert_eq!(empty.summary(), success.summary());
        assert_eq!(empty.summary().as_deref(), Some(NO_RECORDS_MESSAGE));
    }

    #[test]
    fn only_not_found_carries_the_no_match_message() {
        assert_eq!(QueryResult::Empty.message(), Some(NO_MATCHING_RECORDS_MESSAGE));
        assert_eq!(QueryResult::Success(Vec::new()).message(), None);
        let failed = QueryResult::Error(ClientError::server("Server error: 502"));
        assert_eq!(failed.message(), Some("Server error: 502"));
    }

    #[test]
    fn errors_render_their_message() {
        let result = QueryResult::Error(ClientError::server("Server error: 500"));
        assert!(!result.has_no_records());
        assert_eq!(result.summary().as_deref(), Some("Server error: 500"));
        assert!(result.records().is_empty());
    }
}
