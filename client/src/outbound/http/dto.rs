//! DTOs for the backend's JSON payloads.
//!
//! The adapter decodes into these transport DTOs first, then maps into domain
//! types in one pass. Decoding is lenient where the backend has been seen to
//! vary: identifiers and coordinates may arrive as numbers or strings, and
//! the sign-in response may name the address `email` or `user_email`.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::domain::{
    AuthToken, Geometry, LandslideId, Record, ReportDraft, Session, SignUpRequest, UserIdentity,
};

/// JSON scalar that may be a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum ScalarDto {
    Number(Number),
    Text(String),
}

impl ScalarDto {
    pub(super) fn into_text(self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text,
        }
    }

    fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(number) => number.as_f64(),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        };
        value.filter(|value| value.is_finite())
    }

    fn to_u64(&self) -> Option<u64> {
        match self {
            Self::Number(number) => number.as_u64(),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) user_id: String,
    pub(super) user_email: String,
    #[serde(default)]
    pub(super) username: Option<String>,
}

impl UserDto {
    pub(super) fn into_identity(self) -> Result<UserIdentity, String> {
        UserIdentity::try_from_parts(
            &self.user_id,
            &self.user_email,
            self.username.as_deref().unwrap_or_default(),
        )
        .map_err(|err| format!("invalid identity payload: {err}"))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenDto {
    pub(super) access_token: String,
    pub(super) user_id: ScalarDto,
    #[serde(default)]
    pub(super) user_email: Option<String>,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) username: Option<String>,
}

impl TokenDto {
    pub(super) fn into_session(self) -> Result<Session, String> {
        let token = AuthToken::new(&self.access_token)
            .map_err(|err| format!("invalid token payload: {err}"))?;
        let email = self.user_email.or(self.email).unwrap_or_default();
        let user = UserIdentity::try_from_parts(
            &self.user_id.into_text(),
            &email,
            self.username.as_deref().unwrap_or_default(),
        )
        .map_err(|err| format!("invalid token payload: {err}"))?;
        Ok(Session::new(token, user))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RegisterDto<'a> {
    pub(super) username: &'a str,
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

impl<'a> From<&'a SignUpRequest> for RegisterDto<'a> {
    fn from(request: &'a SignUpRequest) -> Self {
        Self {
            username: request.username(),
            email: request.email(),
            password: request.password(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RecordDto {
    #[serde(rename = "landslideID")]
    pub(super) landslide_id: ScalarDto,
    pub(super) latitude: ScalarDto,
    pub(super) longitude: ScalarDto,
    #[serde(rename = "lsType", default)]
    pub(super) ls_type: Option<String>,
    #[serde(rename = "lsSource", default)]
    pub(super) ls_source: Option<String>,
    #[serde(default)]
    pub(super) impact: Option<String>,
    #[serde(default)]
    pub(super) wea13_id: Option<ScalarDto>,
    #[serde(default)]
    pub(super) wea13_type: Option<String>,
    #[serde(default)]
    pub(super) user_id: Option<ScalarDto>,
    #[serde(default)]
    pub(super) geometry: Value,
}

impl RecordDto {
    pub(super) fn into_record(self) -> Result<Record, String> {
        let landslide_id = self.landslide_id.into_text();
        let latitude = self
            .latitude
            .to_f64()
            .ok_or_else(|| format!("record {landslide_id} has an invalid latitude"))?;
        let longitude = self
            .longitude
            .to_f64()
            .ok_or_else(|| format!("record {landslide_id} has an invalid longitude"))?;

        Ok(Record {
            geometry: Geometry::normalize(self.geometry),
            latitude,
            longitude,
            ls_type: self.ls_type.unwrap_or_default(),
            ls_source: self.ls_source.unwrap_or_default(),
            impact: self.impact.unwrap_or_default(),
            wea13_id: self.wea13_id.map(ScalarDto::into_text),
            wea13_type: self.wea13_type,
            user_id: self.user_id.map(ScalarDto::into_text),
            landslide_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct MaxIdsDto {
    #[serde(default)]
    pub(super) max_landslide_id: Option<ScalarDto>,
}

impl MaxIdsDto {
    pub(super) fn into_max(self) -> Result<Option<u64>, String> {
        self.max_landslide_id
            .map(|raw| {
                raw.to_u64()
                    .ok_or_else(|| "max_landslide_id is not a non-negative integer".to_owned())
            })
            .transpose()
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateRecordDto<'a> {
    #[serde(rename = "landslideID")]
    pub(super) landslide_id: &'a str,
    pub(super) latitude: f64,
    pub(super) longitude: f64,
    #[serde(rename = "lsType")]
    pub(super) ls_type: &'static str,
    #[serde(rename = "lsSource")]
    pub(super) ls_source: &'static str,
    pub(super) impact: &'static str,
    pub(super) wea13_id: Option<&'a str>,
    pub(super) wea13_type: Option<&'static str>,
    pub(super) user_id: &'a str,
}

impl<'a> From<&'a ReportDraft> for CreateRecordDto<'a> {
    fn from(draft: &'a ReportDraft) -> Self {
        Self {
            landslide_id: draft.landslide_id.as_str(),
            latitude: draft.latitude,
            longitude: draft.longitude,
            ls_type: draft.ls_type.as_str(),
            ls_source: draft.ls_source.as_str(),
            impact: draft.impact.as_str(),
            wea13_id: draft.wea13_id.as_deref(),
            wea13_type: draft.wea13_type.map(|kind| kind.as_str()),
            user_id: draft.user_id.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedDto {
    #[serde(rename = "landslideID")]
    pub(super) landslide_id: ScalarDto,
}

impl CreatedDto {
    pub(super) fn into_id(self) -> LandslideId {
        LandslideId::new(self.landslide_id.into_text())
    }
}
