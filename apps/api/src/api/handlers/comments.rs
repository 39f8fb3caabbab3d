use axum::{
    extract::{Path, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::users::WriterResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::services::CommentView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub writer: WriterResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CommentView> for CommentResponse {
    fn from(view: &CommentView) -> Self {
        Self {
            id: view.comment.id(),
            post_id: view.comment.post_id(),
            content: view.comment.content().to_string(),
            writer: WriterResponse::from(&view.writer),
            created_at: view.comment.created_at(),
            updated_at: view.comment.updated_at(),
        }
    }
}

/// POST /api/v1/posts/:post_id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(post_id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.comments.create(post_id, user_id, req.content).await?;

    Ok((
        StatusCode::CREATED,
        [(
            LOCATION,
            format!("/api/v1/posts/{}/comments/{}", post_id, view.comment.id()),
        )],
        Json(CommentResponse::from(&view)),
    ))
}

/// Comments on a post, oldest first
///
/// GET /api/v1/posts/:post_id/comments
pub async fn find_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let views = state.comments.find_by_post(post_id).await?;
    Ok(Json(views.iter().map(CommentResponse::from).collect()))
}

/// PUT /api/v1/posts/:post_id/comments/:comment_id
pub async fn update_comment(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CommentRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .comments
        .update(post_id, comment_id, user_id, req.content)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/posts/:post_id/comments/:comment_id
pub async fn delete_comment(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state.comments.delete(post_id, comment_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
