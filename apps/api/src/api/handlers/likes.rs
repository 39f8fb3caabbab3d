use axum::{
    extract::{Path, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::domain::post::Like;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Like> for LikeResponse {
    fn from(like: &Like) -> Self {
        Self {
            id: like.id,
            post_id: like.post_id,
            user_id: like.user_id,
            created_at: like.created_at,
        }
    }
}

/// POST /api/v1/posts/:post_id/likes
pub async fn like_post(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let like = state.likes.like(post_id, user_id).await?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/api/v1/posts/{}/likes/{}", post_id, like.id))],
        Json(LikeResponse::from(&like)),
    ))
}

/// DELETE /api/v1/posts/:post_id/likes
pub async fn unlike_post(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(post_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.likes.unlike(post_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
