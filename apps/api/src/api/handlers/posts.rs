use axum::{
    extract::{Path, Query, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::comments::CommentResponse;
use super::users::WriterResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::{JwtAuth, OptionalJwtAuth};
use crate::domain::post::{MyPostFilter, VaccinationType};
use crate::services::{PostDetails, PostView};
use crate::state::AppState;

/// Request body for writing or editing a post
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub content: String,
    pub vaccination_type: VaccinationType,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostsQuery {
    pub vaccination_type: VaccinationType,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagingQuery {
    pub vaccination_type: VaccinationType,
    pub offset: i64,
    pub size: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MyPostsQuery {
    pub filter: MyPostFilter,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub content: String,
    pub vaccination_type: VaccinationType,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub has_liked: bool,
    pub writer: WriterResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&PostView> for PostResponse {
    fn from(view: &PostView) -> Self {
        Self {
            id: view.post.id(),
            content: view.post.content().to_string(),
            vaccination_type: view.post.vaccination_type(),
            view_count: view.post.view_count(),
            like_count: view.like_count,
            comment_count: view.comment_count,
            has_liked: view.has_liked,
            writer: WriterResponse::from(&view.writer),
            created_at: view.post.created_at(),
            updated_at: view.post.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

impl From<&PostDetails> for PostDetailResponse {
    fn from(details: &PostDetails) -> Self {
        Self {
            post: PostResponse::from(&details.view),
            comments: details.comments.iter().map(CommentResponse::from).collect(),
        }
    }
}

fn to_responses(views: &[PostView]) -> Vec<PostResponse> {
    views.iter().map(PostResponse::from).collect()
}

/// POST /api/v1/posts
pub async fn create_post(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Json(req): Json<PostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .posts
        .create(user_id, req.content, req.vaccination_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/api/v1/posts/{}", view.post.id()))],
        Json(PostResponse::from(&view)),
    ))
}

/// Posts of one vaccine, newest first; `ALL` lists every post
///
/// GET /api/v1/posts?vaccinationType=
pub async fn find_posts(
    State(state): State<AppState>,
    OptionalJwtAuth(viewer): OptionalJwtAuth,
    Query(query): Query<PostsQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let views = state
        .posts
        .find_by_vaccination_type(query.vaccination_type, viewer)
        .await?;
    Ok(Json(to_responses(&views)))
}

/// GET /api/v1/posts/paging?vaccinationType=&offset=&size=
pub async fn find_posts_paged(
    State(state): State<AppState>,
    OptionalJwtAuth(viewer): OptionalJwtAuth,
    Query(query): Query<PagingQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let views = state
        .posts
        .find_by_vaccination_type_paged(query.vaccination_type, query.offset, query.size, viewer)
        .await?;
    Ok(Json(to_responses(&views)))
}

/// Posts the caller wrote, liked or commented on
///
/// GET /api/v1/posts/me?filter=WRITER|LIKER|COMMENTER
pub async fn find_my_posts(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Query(query): Query<MyPostsQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let views = state.posts.find_mine(user_id, query.filter).await?;
    Ok(Json(to_responses(&views)))
}

/// Read a post; counts as a view
///
/// GET /api/v1/posts/:id
pub async fn find_post(
    State(state): State<AppState>,
    OptionalJwtAuth(viewer): OptionalJwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let details = state.posts.find(id, viewer).await?;
    Ok(Json(PostDetailResponse::from(&details)))
}

/// PUT /api/v1/posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<PostRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .posts
        .update(id, user_id, req.content, req.vaccination_type)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.posts.delete(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
