mod products;
mod search;
mod users;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use sole_core::{AppConfig, SneakerSource};
use sole_kicks::{KicksClient, KicksError, SearchOrchestrator};
use sole_store::{StoreError, UserStore};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

const MAX_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub kicks: Arc<KicksClient>,
    pub search: SearchOrchestrator<KicksClient>,
    pub store: Arc<UserStore>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, kicks: KicksClient, store: UserStore) -> Self {
        let kicks = Arc::new(kicks);
        Self {
            config: Arc::new(config),
            search: SearchOrchestrator::new(Arc::clone(&kicks)),
            kicks,
            store: Arc::new(store),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: RequestId) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id.0),
        })
    }
}

/// Error response. The body is `{"error": <message>}` unless an upstream
/// body is being relayed as-is.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Relays an upstream status and body unchanged.
    pub fn passthrough(status: u16, body: Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            body,
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.body {
            map.insert(key.to_string(), value);
        }
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    upstream_auth: &'static str,
}

pub(super) fn map_kicks_error(request_id: &RequestId, error: KicksError) -> ApiError {
    match error {
        KicksError::Upstream { status, url, body } => {
            tracing::warn!(request_id = %request_id.0, status, %url, "upstream error relayed");
            ApiError::passthrough(status, body)
        }
        KicksError::NotFound { id } => {
            tracing::info!(request_id = %request_id.0, %id, "product not found");
            ApiError::not_found("Product not found")
        }
        other => {
            tracing::error!(request_id = %request_id.0, error = %other, "upstream request failed");
            ApiError::internal(other.to_string())
        }
    }
}

pub(super) fn map_store_error(request_id: &RequestId, error: &StoreError) -> ApiError {
    match error {
        StoreError::UsernameTaken(_) => ApiError::new(StatusCode::CONFLICT, error.to_string()),
        StoreError::InvalidCredentials => {
            ApiError::new(StatusCode::UNAUTHORIZED, error.to_string())
        }
        StoreError::UserNotFound(_) => ApiError::not_found(error.to_string()),
        StoreError::EmptyUsername | StoreError::EmptyPassword => {
            ApiError::bad_request(error.to_string())
        }
        StoreError::Io { .. } | StoreError::Serialize(_) => {
            tracing::error!(request_id = %request_id.0, error = %error, "user store failure");
            ApiError::internal("user store unavailable")
        }
    }
}

/// Parses a single-marketplace `source`, defaulting to StockX.
pub(super) fn parse_source(source: Option<&str>) -> Result<SneakerSource, ApiError> {
    source
        .unwrap_or("stockx")
        .parse::<SneakerSource>()
        .map_err(|_| ApiError::bad_request("source must be 'stockx' or 'goat'"))
}

pub(super) fn normalize_limit(limit: Option<u32>, default: u32) -> u32 {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/products", get(products::list_products))
        .route("/api/product/{id}", get(products::get_product))
        .route("/api/search", get(search::search))
        .route("/api/curated", get(search::curated))
        .route("/api/users", post(users::register))
        .route(
            "/api/session",
            post(users::login)
                .get(users::current_session)
                .delete(users::logout),
        )
        .route("/api/users/{id}/shoe-size", put(users::set_shoe_size))
        .route(
            "/api/users/{id}/likes/{style_id}",
            post(users::toggle_like),
        )
        .route("/api/users/{id}/likes", get(users::list_likes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    ApiResponse::new(
        HealthData {
            status: "ok",
            upstream_auth: if state.config.kicks_api_key.is_some() {
                "configured"
            } else {
                "missing"
            },
        },
        req_id,
    )
}
