use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use sole_core::{Sneaker, UserProfile};
use sole_kicks::fetch_liked;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ShoeSizeBody {
    pub size: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct LikeState {
    #[serde(rename = "styleID")]
    style_id: String,
    liked: bool,
}

pub(super) async fn register(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .store
        .register(&body.username, &body.password)
        .await
        .map_err(|e| map_store_error(&req_id, &e))?;
    Ok((StatusCode::CREATED, ApiResponse::new(profile, req_id)))
}

/// Checks credentials and makes the account the current user.
pub(super) async fn login(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<Credentials>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .store
        .authenticate(&body.username, &body.password)
        .await
        .map_err(|e| map_store_error(&req_id, &e))?;
    state
        .store
        .set_current_user(&profile.id)
        .await
        .map_err(|e| map_store_error(&req_id, &e))?;

    tracing::info!(request_id = %req_id.0, user_id = %profile.id, "user signed in");
    Ok(ApiResponse::new(profile, req_id))
}

pub(super) async fn current_session(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Option<UserProfile>>> {
    ApiResponse::new(state.store.current_user().await, req_id)
}

pub(super) async fn logout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .clear_current_user()
        .await
        .map_err(|e| map_store_error(&req_id, &e))?;
    tracing::info!(request_id = %req_id.0, "user signed out");
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn set_shoe_size(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Json(body): Json<ShoeSizeBody>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .store
        .set_shoe_size(&user_id, body.size.as_deref())
        .await
        .map_err(|e| map_store_error(&req_id, &e))?;
    Ok(ApiResponse::new(profile, req_id))
}

pub(super) async fn toggle_like(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((user_id, style_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<LikeState>>, ApiError> {
    if style_id.trim().is_empty() {
        return Err(ApiError::bad_request("styleID must not be empty"));
    }
    let liked = state
        .store
        .toggle_like(&user_id, &style_id)
        .await
        .map_err(|e| map_store_error(&req_id, &e))?;
    Ok(ApiResponse::new(LikeState { style_id, liked }, req_id))
}

/// Liked sneakers with full marketplace records. Ids no marketplace can
/// resolve are left out.
pub(super) async fn list_likes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Sneaker>>>, ApiError> {
    let ids = state
        .store
        .liked_style_ids(&user_id)
        .await
        .map_err(|e| map_store_error(&req_id, &e))?;

    let sneakers = fetch_liked(
        state.kicks.as_ref(),
        &ids,
        state.config.liked_fetch_concurrency,
    )
    .await;
    Ok(ApiResponse::new(sneakers, req_id))
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
