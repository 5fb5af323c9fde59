//! Stub landslide backend for end-to-end adapter tests.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. Dropping the harness stops the
//! server, even if a test panics.

use std::collections::HashMap;
use std::future::Future;
use std::net::TcpListener;
use std::sync::{Mutex, MutexGuard};

use actix_web::dev::ServerHandle;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use landslide_client::outbound::HttpBackend;
use reqwest::Url;
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

const NO_MATCH_DETAIL: &str = "No data import records found matching your criteria.";

/// Account known to the stub.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Account {
    fn token(&self) -> String {
        format!("stub-token-{}", self.id)
    }
}

/// Mutable backend state shared with the handlers.
#[derive(Debug, Default)]
pub struct StubState {
    pub accounts: Vec<Account>,
    pub records: Vec<Value>,
    pub created: Vec<Value>,
    pub query_strings: Vec<String>,
    /// Replaces the computed `/get-max-ids/` body when set.
    pub max_ids_body: Option<Value>,
    /// Status returned by `/data-imports/` instead of accepting the record.
    pub reject_creates_with: Option<u16>,
}

impl StubState {
    pub fn with_account(mut self, username: &str, email: &str, password: &str) -> Self {
        let id = self.accounts.len() as u64 + 1;
        self.accounts.push(Account {
            id,
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        });
        self
    }

    pub fn with_record(mut self, record: Value) -> Self {
        self.records.push(record);
        self
    }
}

type SharedState = web::Data<Mutex<StubState>>;

/// Running stub server.
pub struct StubBackend {
    runtime: Runtime,
    local: LocalSet,
    base_url: String,
    server: ServerHandle,
    state: SharedState,
}

impl StubBackend {
    pub fn start(state: StubState) -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        let local = LocalSet::new();
        let state = web::Data::new(Mutex::new(state));

        let (base_url, server) = local
            .block_on(&runtime, spawn_stub_server(state.clone()))
            .expect("stub server should start");

        Self {
            runtime,
            local,
            base_url,
            server,
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Adapter pointed at this stub.
    pub fn http_backend(&self) -> HttpBackend {
        let url = Url::parse(&self.base_url).expect("stub url");
        HttpBackend::new(url, Some(std::time::Duration::from_secs(10))).expect("http backend")
    }

    pub fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().expect("stub state lock")
    }

    /// Issued token for the account with `email`.
    pub fn token_for(&self, email: &str) -> String {
        self.state()
            .accounts
            .iter()
            .find(|account| account.email == email)
            .map(Account::token)
            .expect("known account")
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.local.block_on(&self.runtime, future)
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        let server = self.server.clone();
        self.local.block_on(&self.runtime, async move {
            server.stop(true).await;
        });
    }
}

async fn spawn_stub_server(state: SharedState) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/token", web::post().to(token))
            .route("/users/me", web::get().to(users_me))
            .route("/register", web::post().to(register))
            .route("/query-data-imports/", web::get().to(query_data_imports))
            .route("/get-max-ids/", web::get().to(get_max_ids))
            .route("/data-imports/", web::post().to(create_data_import))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

fn detail(status: u16, message: &str) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(status).expect("valid status");
    HttpResponse::build(status).json(json!({ "detail": message }))
}

async fn token(state: SharedState, form: web::Form<HashMap<String, String>>) -> HttpResponse {
    let state = state.lock().expect("stub state lock");
    let email = form.get("email").map(String::as_str).unwrap_or_default();
    let password = form.get("password").map(String::as_str).unwrap_or_default();
    match state
        .accounts
        .iter()
        .find(|account| account.email == email && account.password == password)
    {
        Some(account) => HttpResponse::Ok().json(json!({
            "access_token": account.token(),
            "token_type": "bearer",
            "user_id": account.id,
            "email": account.email,
            "username": account.username,
        })),
        None => detail(401, "Incorrect email or password"),
    }
}

async fn users_me(state: SharedState, request: HttpRequest) -> HttpResponse {
    let state = state.lock().expect("stub state lock");
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    match state
        .accounts
        .iter()
        .find(|account| bearer == Some(account.token().as_str()))
    {
        Some(account) => HttpResponse::Ok().json(json!({
            "user_id": account.id.to_string(),
            "user_email": account.email,
            "username": account.username,
        })),
        None => detail(401, "Could not validate credentials"),
    }
}

async fn register(state: SharedState, body: web::Json<Value>) -> HttpResponse {
    let mut state = state.lock().expect("stub state lock");
    let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or_default().to_owned();
    let email = field("email");
    if state.accounts.iter().any(|account| account.email == email) {
        return detail(400, "Email already registered");
    }
    let id = state.accounts.len() as u64 + 1;
    state.accounts.push(Account {
        id,
        username: field("username"),
        email,
        password: field("password"),
    });
    HttpResponse::Ok().json(json!({ "message": "User registered successfully" }))
}

async fn query_data_imports(
    state: SharedState,
    request: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let mut state = state.lock().expect("stub state lock");
    state.query_strings.push(request.query_string().to_owned());
    let wanted = query.get("search_landslideid");
    let matches = state
        .records
        .iter()
        .filter(|record| {
            wanted.is_none_or(|id| id_text(record).as_deref() == Some(id.as_str()))
        })
        .cloned()
        .collect::<Vec<_>>();
    if matches.is_empty() {
        return detail(404, NO_MATCH_DETAIL);
    }
    HttpResponse::Ok().json(matches)
}

async fn get_max_ids(state: SharedState) -> HttpResponse {
    let state = state.lock().expect("stub state lock");
    if let Some(body) = &state.max_ids_body {
        return HttpResponse::Ok().json(body);
    }
    let max = state
        .records
        .iter()
        .filter_map(|record| id_text(record)?.parse::<u64>().ok())
        .max();
    HttpResponse::Ok().json(json!({ "max_landslide_id": max }))
}

async fn create_data_import(state: SharedState, body: web::Json<Value>) -> HttpResponse {
    let mut state = state.lock().expect("stub state lock");
    if let Some(status) = state.reject_creates_with {
        return detail(status, "Could not create record");
    }
    let payload = body.into_inner();
    state.created.push(payload.clone());
    state.records.push(payload.clone());
    HttpResponse::Ok().json(payload)
}

fn id_text(record: &Value) -> Option<String> {
    match record.get("landslideID")? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
