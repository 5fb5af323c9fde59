//! Landslide records and their geometry.
//!
//! The backend may send a record's geometry as a structured GeoJSON object
//! or as that object encoded into a JSON string. [`Geometry::normalize`]
//! turns either form into a structured value; anything it cannot read
//! becomes `None` for that record alone.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

/// GeoJSON position: longitude, latitude and an optional altitude.
pub type Position = Vec<f64>;

/// Structured geometry attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Single location.
    Point {
        /// `[lng, lat]` position.
        coordinates: Position,
    },
    /// Several unconnected locations.
    MultiPoint {
        /// Member positions.
        coordinates: Vec<Position>,
    },
    /// Connected path.
    LineString {
        /// Path vertices.
        coordinates: Vec<Position>,
    },
    /// Area bounded by one outer ring and optional holes.
    Polygon {
        /// Linear rings; the first is the exterior.
        coordinates: Vec<Vec<Position>>,
    },
}

impl Geometry {
    /// Normalise a raw geometry value received from the backend.
    ///
    /// # Examples
    /// ```
    /// use landslide_client::domain::Geometry;
    /// use serde_json::json;
    ///
    /// let encoded = json!(r#"{"type":"Point","coordinates":[-97.1751,38.6263]}"#);
    /// assert_eq!(
    ///     Geometry::normalize(encoded),
    ///     Some(Geometry::Point { coordinates: vec![-97.1751, 38.6263] })
    /// );
    /// assert_eq!(Geometry::normalize(json!("{not json")), None);
    /// ```
    pub fn normalize(raw: Value) -> Option<Self> {
        let structured = match raw {
            Value::Null => return None,
            Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
                Ok(value) => value,
                Err(error) => {
                    warn!(%error, "discarding geometry: encoded string is not JSON");
                    return None;
                }
            },
            other => other,
        };

        match serde_json::from_value::<Self>(structured) {
            Ok(geometry) if geometry.is_well_formed() => Some(geometry),
            Ok(_) => {
                warn!("discarding geometry: positions are not finite 2D or 3D coordinates");
                None
            }
            Err(error) => {
                warn!(%error, "discarding geometry: unsupported shape");
                None
            }
        }
    }

    fn is_well_formed(&self) -> bool {
        match self {
            Self::Point { coordinates } => is_position(coordinates),
            Self::MultiPoint { coordinates } | Self::LineString { coordinates } => {
                coordinates.iter().all(|position| is_position(position))
            }
            Self::Polygon { coordinates } => coordinates
                .iter()
                .flatten()
                .all(|position| is_position(position)),
        }
    }
}

fn is_position(position: &[f64]) -> bool {
    (2..=3).contains(&position.len()) && position.iter().all(|value| value.is_finite())
}

/// One landslide observation returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Backend identifier.
    pub landslide_id: String,
    /// Latitude in WGS84.
    pub latitude: f64,
    /// Longitude in WGS84.
    pub longitude: f64,
    /// Landslide type classification.
    pub ls_type: String,
    /// Natural or modified origin.
    pub ls_source: String,
    /// Observed impact.
    pub impact: String,
    /// Secondary classification identifier.
    pub wea13_id: Option<String>,
    /// Secondary classification type.
    pub wea13_type: Option<String>,
    /// Reporting user, when recorded.
    pub user_id: Option<String>,
    /// Normalised geometry; `None` when absent or unreadable.
    pub geometry: Option<Geometry>,
}

/// Build a GeoJSON `FeatureCollection` for map renderers.
///
/// Records without geometry are kept with a `null` geometry so list and map
/// views stay aligned.
pub fn records_to_feature_collection(records: &[Record]) -> Value {
    let features = records
        .iter()
        .map(|record| {
            let geometry = record
                .geometry
                .as_ref()
                .and_then(|geometry| serde_json::to_value(geometry).ok())
                .unwrap_or(Value::Null);
            json!({
                "type": "Feature",
                "properties": {
                    "landslideid": record.landslide_id,
                    "latitude": record.latitude,
                    "longitude": record.longitude,
                    "lsType": record.ls_type,
                    "lssource": record.ls_source,
                    "impact": record.impact,
                    "wea13_id": record.wea13_id,
                    "wea13_type": record.wea13_type,
                },
                "geometry": geometry,
            })
        })
        .collect::<Vec<_>>();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
