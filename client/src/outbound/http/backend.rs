//! Reqwest-backed adapter for the landslide backend.
//!
//! This adapter owns transport details only: URL building, request
//! serialisation, HTTP status mapping and JSON decoding into domain types.
//! Message wording is left to the domain services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::debug;

use super::dto::{CreateRecordDto, CreatedDto, MaxIdsDto, RecordDto, RegisterDto, TokenDto, UserDto};
use crate::domain::ports::{AuthApi, AuthApiError, RecordsApi, RecordsApiError};
use crate::domain::{
    AuthToken, ErrorDetail, LandslideId, QueryFilter, Record, ReportDraft, Session,
    SignInCredentials, SignUpRequest, UserIdentity,
};

const USERS_ME_PATH: &str = "users/me";
const TOKEN_PATH: &str = "token";
const REGISTER_PATH: &str = "register";
const QUERY_PATH: &str = "query-data-imports/";
const MAX_IDS_PATH: &str = "get-max-ids/";
const CREATE_PATH: &str = "data-imports/";

/// Raw outcome of one exchange: status plus the full body.
struct Reply {
    status: StatusCode,
    body: Vec<u8>,
}

/// HTTP adapter implementing both [`AuthApi`] and [`RecordsApi`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Build an adapter rooted at `base_url`.
    ///
    /// `timeout` bounds each request; `None` waits indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: with_trailing_slash(base_url),
        })
    }

    /// Root every endpoint path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, String> {
        self.base_url
            .join(path)
            .map_err(|err| format!("invalid endpoint {path}: {err}"))
    }

    async fn exchange(&self, request: RequestBuilder) -> Result<Reply, reqwest::Error> {
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        debug!(status = status.as_u16(), bytes = body.len(), "backend replied");
        Ok(Reply { status, body })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn query_url(mut endpoint: Url, filter: &QueryFilter) -> Url {
    if !filter.is_empty() {
        endpoint.set_query(Some(&filter.to_query_string()));
    }
    endpoint
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, String> {
    serde_json::from_slice(body).map_err(|err| format!("invalid JSON payload: {err}"))
}

fn auth_rejection(reply: &Reply) -> AuthApiError {
    AuthApiError::rejected(reply.status.as_u16(), ErrorDetail::from_body(&reply.body))
}

fn records_rejection(reply: &Reply) -> RecordsApiError {
    let detail = ErrorDetail::from_body(&reply.body);
    if reply.status == StatusCode::NOT_FOUND {
        RecordsApiError::not_found(detail)
    } else {
        RecordsApiError::rejected(reply.status.as_u16(), detail)
    }
}

fn parse_records(body: &[u8]) -> Result<Vec<Record>, RecordsApiError> {
    let decoded: Vec<RecordDto> = decode(body).map_err(RecordsApiError::decode)?;
    decoded
        .into_iter()
        .map(RecordDto::into_record)
        .collect::<Result<Vec<_>, _>>()
        .map_err(RecordsApiError::decode)
}

#[async_trait]
impl AuthApi for HttpBackend {
    async fn current_user(&self, token: &AuthToken) -> Result<UserIdentity, AuthApiError> {
        let url = self.endpoint(USERS_ME_PATH).map_err(AuthApiError::transport)?;
        let reply = self
            .exchange(self.client.get(url).bearer_auth(token.expose()))
            .await
            .map_err(|err| AuthApiError::transport(err.to_string()))?;
        if !reply.status.is_success() {
            return Err(auth_rejection(&reply));
        }
        decode::<UserDto>(&reply.body)
            .and_then(UserDto::into_identity)
            .map_err(AuthApiError::decode)
    }

    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<Session, AuthApiError> {
        let url = self.endpoint(TOKEN_PATH).map_err(AuthApiError::transport)?;
        let form = [
            ("email", credentials.email()),
            ("password", credentials.password()),
        ];
        let reply = self
            .exchange(self.client.post(url).form(&form))
            .await
            .map_err(|err| AuthApiError::transport(err.to_string()))?;
        if !reply.status.is_success() {
            return Err(auth_rejection(&reply));
        }
        decode::<TokenDto>(&reply.body)
            .and_then(TokenDto::into_session)
            .map_err(AuthApiError::decode)
    }

    async fn register(&self, request: &SignUpRequest) -> Result<(), AuthApiError> {
        let url = self.endpoint(REGISTER_PATH).map_err(AuthApiError::transport)?;
        let reply = self
            .exchange(self.client.post(url).json(&RegisterDto::from(request)))
            .await
            .map_err(|err| AuthApiError::transport(err.to_string()))?;
        if !reply.status.is_success() {
            return Err(auth_rejection(&reply));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordsApi for HttpBackend {
    async fn query_records(&self, filter: &QueryFilter) -> Result<Vec<Record>, RecordsApiError> {
        let endpoint = self.endpoint(QUERY_PATH).map_err(RecordsApiError::transport)?;
        let url = query_url(endpoint, filter);
        debug!(%url, "querying records");
        let reply = self
            .exchange(self.client.get(url))
            .await
            .map_err(|err| RecordsApiError::transport(err.to_string()))?;
        if !reply.status.is_success() {
            return Err(records_rejection(&reply));
        }
        parse_records(&reply.body)
    }

    async fn max_landslide_id(&self) -> Result<Option<u64>, RecordsApiError> {
        let url = self.endpoint(MAX_IDS_PATH).map_err(RecordsApiError::transport)?;
        let reply = self
            .exchange(self.client.get(url))
            .await
            .map_err(|err| RecordsApiError::transport(err.to_string()))?;
        if !reply.status.is_success() {
            return Err(records_rejection(&reply));
        }
        decode::<MaxIdsDto>(&reply.body)
            .and_then(MaxIdsDto::into_max)
            .map_err(RecordsApiError::decode)
    }

    async fn create_record(&self, draft: &ReportDraft) -> Result<LandslideId, RecordsApiError> {
        let url = self.endpoint(CREATE_PATH).map_err(RecordsApiError::transport)?;
        let reply = self
            .exchange(self.client.post(url).json(&CreateRecordDto::from(draft)))
            .await
            .map_err(|err| RecordsApiError::transport(err.to_string()))?;
        if !reply.status.is_success() {
            let detail = ErrorDetail::from_body(&reply.body);
            return Err(RecordsApiError::rejected(reply.status.as_u16(), detail));
        }
        decode::<CreatedDto>(&reply.body)
            .map(CreatedDto::into_id)
            .map_err(RecordsApiError::decode)
    }
}
