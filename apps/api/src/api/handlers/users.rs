use axum::{
    extract::{Path, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::domain::user::{AgeRange, SocialProvider, User};
use crate::services::{LoginOutcome, SignupCommand, UpdateUserCommand};
use crate::state::AppState;

/// Request body for social login
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub social_provider: SocialProvider,
    pub authorization_code: String,
    pub state: Option<String>,
}

/// Response from social login
///
/// On a first login only the social profile and `signup_token` are filled
/// in; the client then completes signup by presenting the token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Option<Uuid>,
    pub access_token: Option<String>,
    pub first_login: bool,
    pub social_provider: SocialProvider,
    pub social_id: String,
    pub social_profile_url: Option<String>,
    pub signup_token: Option<String>,
}

/// Request body for signup
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub nickname: String,
    pub age_range: AgeRange,
    pub signup_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub nickname: Option<String>,
    pub age_range: Option<AgeRange>,
    pub shot_verified: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub nickname: String,
    pub age_range: AgeRange,
    pub shot_verified: bool,
    pub social_provider: SocialProvider,
    pub social_profile_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            nickname: user.nickname().to_string(),
            age_range: user.age_range(),
            shot_verified: user.shot_verified(),
            social_provider: user.social_provider(),
            social_profile_url: user.social_profile_url().map(str::to_string),
            created_at: user.created_at(),
        }
    }
}

/// Writer summary embedded in posts and comments
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterResponse {
    pub id: Uuid,
    pub nickname: String,
    pub shot_verified: bool,
    pub social_profile_url: Option<String>,
}

impl From<&User> for WriterResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            nickname: user.nickname().to_string(),
            shot_verified: user.shot_verified(),
            social_profile_url: user.social_profile_url().map(str::to_string),
        }
    }
}

/// Redeem a social login code
///
/// POST /api/v1/users/auth
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state
        .users
        .login(req.social_provider, &req.authorization_code, req.state.as_deref())
        .await?;

    let response = match outcome {
        LoginOutcome::Registered { user, access_token } => LoginResponse {
            user_id: Some(user.id()),
            access_token: Some(access_token),
            first_login: false,
            social_provider: user.social_provider(),
            social_id: user.social_id().to_string(),
            social_profile_url: user.social_profile_url().map(str::to_string),
            signup_token: None,
        },
        LoginOutcome::FirstLogin {
            profile,
            signup_token,
        } => LoginResponse {
            user_id: None,
            access_token: None,
            first_login: true,
            social_provider: profile.provider,
            social_id: profile.social_id,
            social_profile_url: profile.profile_url,
            signup_token: Some(signup_token),
        },
    };

    Ok(Json(response))
}

/// Register a user after their first social login
///
/// POST /api/v1/users
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, access_token) = state
        .users
        .signup(SignupCommand {
            nickname: req.nickname,
            age_range: req.age_range,
            signup_token: req.signup_token,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/api/v1/users/{}", user.id()))],
        Json(SignupResponse {
            user: UserResponse::from(&user),
            access_token,
        }),
    ))
}

/// GET /api/v1/users/me
pub async fn find_me(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.find_me(user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Json(req): Json<UpdateUserRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .users
        .update(
            user_id,
            UpdateUserCommand {
                nickname: req.nickname,
                age_range: req.age_range,
                shot_verified: req.shot_verified,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete the account with everything it wrote
///
/// DELETE /api/v1/users/me
pub async fn delete_me(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
) -> Result<StatusCode, ApiError> {
    state.users.delete(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Public profile
///
/// GET /api/v1/users/:id
pub async fn find_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.find(id).await?;
    Ok(Json(UserResponse::from(&user)))
}
