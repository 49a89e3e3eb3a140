//! In-process stub of the market data API for integration tests.
//!
//! Each test starts its own server on an ephemeral port and scripts the
//! responses it needs through [`StubState`]. Unconfigured lookups answer
//! 404/500 the way the real backend does, so failure paths are exercised
//! with real HTTP status codes.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use marketdeck::storage::{KeyValueStorage, MemoryStorage};
use marketdeck::{ApiClient, ApiConfig, SessionStore};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// How the stub wraps list payloads, to exercise envelope tolerance.
#[derive(Clone, Copy)]
pub enum Envelope {
    Data,
    Content,
    Bare,
}

#[derive(Default)]
pub struct StubState {
    pub assets: Mutex<Vec<Value>>,
    /// symbol -> overview; symbols missing here answer 500.
    pub overviews: Mutex<HashMap<String, Value>>,
    /// asset id -> chart points; ids missing here answer 500.
    pub charts: Mutex<HashMap<String, Value>>,
    /// asset id -> history candles; ids missing here answer 500.
    pub histories: Mutex<HashMap<String, Value>>,
    /// asset id -> stats; ids missing here answer 500.
    pub stats: Mutex<HashMap<String, Value>>,
    /// asset id -> trailing price change; ids missing here answer 500.
    pub changes: Mutex<HashMap<String, Value>>,
    pub gainers: Mutex<Vec<Value>>,
    pub losers: Mutex<Vec<Value>>,
    /// Watchlist with idempotent (set) add semantics.
    pub watchlist: Mutex<Vec<String>>,
    /// Scripted fetch-all status sequence; empty pops answer DONE.
    pub job_statuses: Mutex<VecDeque<&'static str>>,
    pub status_requests: AtomicUsize,
    pub start_requests: AtomicUsize,
    pub fetch_requests: AtomicUsize,
    pub fail_job_start: Mutex<bool>,
    /// Profile for /users/me; `None` answers 401.
    pub me: Mutex<Option<Value>>,
    /// Last Authorization header seen on /users/me.
    pub last_auth: Mutex<Option<String>>,
    pub list_envelope: Mutex<Option<Envelope>>,
    /// Login accepted for this (username, password) pair.
    pub credentials: Mutex<Option<(String, String)>>,
    pub login_response: Mutex<Option<Value>>,
}

pub struct StubApi {
    pub state: Arc<StubState>,
    pub base_url: String,
}

impl StubApi {
    pub async fn start() -> Self {
        let state = Arc::new(StubState {
            list_envelope: Mutex::new(Some(Envelope::Bare)),
            ..Default::default()
        });

        let router = Router::new()
            .route("/assets", get(list_assets))
            .route("/assets/:symbol/overview", get(asset_overview))
            .route("/assets/search", get(search_assets))
            .route("/assets/:id", delete(delete_asset))
            .route("/prices/:id/latest", get(latest_price))
            .route("/prices/:id/chart", get(price_chart))
            .route("/prices/:id/history/paged", get(price_history))
            .route("/prices/:id/stats", get(price_stats))
            .route("/prices/:id/change", get(price_change))
            .route("/prices/:id/fetch", post(fetch_price))
            .route("/prices/top", get(top_movers))
            .route("/prices/fetch-all/start", post(start_fetch_all))
            .route("/prices/fetch-all/status/:job", get(fetch_all_status))
            .route("/users/me", get(me).put(update_me))
            .route(
                "/users/watchlist",
                get(get_watchlist)
                    .post(add_watchlist)
                    .delete(remove_watchlist),
            )
            .route("/auth/login", post(login))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{addr}"),
        }
    }

    /// Client plus the storage it shares with the session layer.
    pub fn client(&self) -> (ApiClient, Arc<dyn KeyValueStorage>) {
        let storage = MemoryStorage::shared();
        let client = ApiClient::new(ApiConfig::new(&self.base_url), storage.clone()).unwrap();
        (client, storage)
    }

    /// Client, session store, and their shared storage.
    pub fn env(&self) -> (ApiClient, SessionStore, Arc<dyn KeyValueStorage>) {
        let (client, storage) = self.client();
        let session = SessionStore::new(storage.clone());
        (client, session, storage)
    }

    pub fn add_asset(&self, id: &str, symbol: &str, name: &str) {
        self.state.assets.lock().push(json!({
            "id": id, "symbol": symbol, "name": name, "type": "STOCK",
        }));
    }

    pub fn add_overview(&self, symbol: &str, overview: Value) {
        self.state
            .overviews
            .lock()
            .insert(symbol.to_string(), overview);
    }

    pub fn script_job(&self, statuses: &[&'static str]) {
        *self.state.job_statuses.lock() = statuses.iter().copied().collect();
    }
}

fn server_error() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "stubbed failure" })),
    )
}

async fn list_assets(State(state): State<Arc<StubState>>) -> Json<Value> {
    let assets = Value::Array(state.assets.lock().clone());
    let wrapped = match (*state.list_envelope.lock()).unwrap_or(Envelope::Bare) {
        Envelope::Data => json!({ "data": assets }),
        Envelope::Content => json!({ "content": assets, "totalPages": 1 }),
        Envelope::Bare => assets,
    };
    Json(wrapped)
}

async fn asset_overview(
    State(state): State<Arc<StubState>>,
    Path(symbol): Path<String>,
) -> impl IntoResponse {
    match state.overviews.lock().get(&symbol) {
        Some(overview) => (StatusCode::OK, Json(overview.clone())),
        None => server_error(),
    }
}

async fn search_assets(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let query = params.get("query").cloned().unwrap_or_default().to_lowercase();
    let matches: Vec<Value> = state
        .assets
        .lock()
        .iter()
        .filter(|asset| {
            asset["symbol"]
                .as_str()
                .is_some_and(|s| s.to_lowercase().contains(&query))
        })
        .cloned()
        .collect();
    Json(Value::Array(matches))
}

async fn delete_asset(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut assets = state.assets.lock();
    let before = assets.len();
    assets.retain(|asset| asset["id"].as_str() != Some(id.as_str()));
    if assets.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "no such asset" })));
    }
    (StatusCode::OK, Json(json!({ "deleted": id })))
}

async fn latest_price(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    // Reuse the overview table keyed by id for latest-price lookups.
    for overview in state.overviews.lock().values() {
        if overview["id"].as_str() == Some(id.as_str()) {
            return (
                StatusCode::OK,
                Json(json!({
                    "assetId": id,
                    "price": overview["currentPrice"],
                    "changePercent": overview["changePercent"],
                })),
            );
        }
    }
    server_error()
}

async fn price_chart(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.charts.lock().get(&id) {
        Some(points) => (StatusCode::OK, Json(json!({ "data": points }))),
        None => server_error(),
    }
}

async fn price_history(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.histories.lock().get(&id) {
        Some(candles) => (
            StatusCode::OK,
            Json(json!({ "content": candles, "totalPages": 1 })),
        ),
        None => server_error(),
    }
}

async fn price_stats(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.stats.lock().get(&id) {
        Some(stats) => (StatusCode::OK, Json(json!({ "data": stats }))),
        None => server_error(),
    }
}

async fn price_change(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.changes.lock().get(&id) {
        Some(change) => (StatusCode::OK, Json(json!({ "data": change }))),
        None => server_error(),
    }
}

async fn fetch_price(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state.fetch_requests.fetch_add(1, Ordering::SeqCst);
    for overview in state.overviews.lock().values() {
        if overview["id"].as_str() == Some(id.as_str()) {
            return (
                StatusCode::OK,
                Json(json!({
                    "assetId": id,
                    "price": overview["currentPrice"],
                    "changePercent": overview["changePercent"],
                })),
            );
        }
    }
    server_error()
}

async fn top_movers(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    // Without an explicit limit the stub returns everything, so tests can
    // tell whether the client actually sent one.
    let limit: usize = params
        .get("limit")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(usize::MAX);
    let movers = match params.get("type").map(String::as_str) {
        Some("losers") => state.losers.lock().clone(),
        _ => state.gainers.lock().clone(),
    };
    Json(json!({ "data": movers.into_iter().take(limit).collect::<Vec<_>>() }))
}

async fn start_fetch_all(State(state): State<Arc<StubState>>) -> impl IntoResponse {
    state.start_requests.fetch_add(1, Ordering::SeqCst);
    if *state.fail_job_start.lock() {
        return server_error();
    }
    (StatusCode::OK, Json(json!({ "jobId": "job-1", "message": "started" })))
}

async fn fetch_all_status(
    State(state): State<Arc<StubState>>,
    Path(_job): Path<String>,
) -> Json<Value> {
    state.status_requests.fetch_add(1, Ordering::SeqCst);
    let status = state.job_statuses.lock().pop_front().unwrap_or("DONE");
    Json(json!({ "status": status }))
}

async fn me(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    *state.last_auth.lock() = auth.clone();

    if auth.is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "no token" })));
    }
    match state.me.lock().clone() {
        Some(profile) => (StatusCode::OK, Json(json!({ "data": profile }))),
        None => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unknown user" }))),
    }
}

async fn update_me(
    State(state): State<Arc<StubState>>,
    Json(update): Json<Value>,
) -> impl IntoResponse {
    let mut me = state.me.lock();
    let Some(profile) = me.as_mut() else {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unknown user" })));
    };
    if let (Value::Object(profile), Value::Object(update)) = (&mut *profile, update) {
        for (key, value) in update {
            profile.insert(key, value);
        }
    }
    (StatusCode::OK, Json(json!({ "data": me.clone() })))
}

async fn get_watchlist(State(state): State<Arc<StubState>>) -> Json<Value> {
    Json(json!({ "data": state.watchlist.lock().clone() }))
}

async fn add_watchlist(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let Some(symbol) = body["symbol"].as_str() else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "symbol required" })));
    };
    let mut watchlist = state.watchlist.lock();
    // The backend treats membership as a set.
    if !watchlist.iter().any(|existing| existing == symbol) {
        watchlist.push(symbol.to_string());
    }
    (StatusCode::OK, Json(json!({ "data": watchlist.clone() })))
}

async fn remove_watchlist(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let Some(symbol) = body["symbol"].as_str() else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "symbol required" })));
    };
    state.watchlist.lock().retain(|existing| existing != symbol);
    (StatusCode::OK, Json(json!({ "data": state.watchlist.lock().clone() })))
}

async fn login(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let expected = state.credentials.lock().clone();
    let ok = expected.is_some_and(|(user, pass)| {
        body["username"].as_str() == Some(user.as_str())
            && body["password"].as_str() == Some(pass.as_str())
    });
    if !ok {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad credentials" })));
    }
    let response = state
        .login_response
        .lock()
        .clone()
        .unwrap_or_else(|| json!({ "token": "stub-token" }));
    (StatusCode::OK, Json(response))
}

/// Overview payload helper with the fields the enrichment paths read.
pub fn overview(id: &str, symbol: &str, name: &str, price: f64, change: f64) -> Value {
    json!({
        "id": id,
        "symbol": symbol,
        "name": name,
        "currentPrice": price,
        "changePercent": change,
        "volume": 1000.0,
        "peRatio": 15.0,
        "pbRatio": 2.0,
    })
}
