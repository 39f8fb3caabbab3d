//! End-to-end API integration tests
//!
//! These tests drive the complete router against the in-memory store with
//! fake social login and public data providers:
//! - Social login and signup
//! - Posts, comments and likes with ownership rules
//! - JWT authentication on protected endpoints
//! - Public vaccination statistics ingestion

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use cvi_api::api;
use cvi_api::auth::jwt::JwtTokenProvider;
use cvi_api::auth::oauth::{SocialAuthClient, SocialAuthClients, SocialProfile};
use cvi_api::domain::errors::DomainResult;
use cvi_api::domain::public_data::{
    KoreaVaccinationRecord, VaccinationDataSource, WorldVaccinationRecord,
};
use cvi_api::domain::user::SocialProvider;
use cvi_api::infrastructure::repositories::InMemoryStore;
use cvi_api::state::{AppState, Repositories};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

/// Social client whose profile id is the authorization code itself
struct EchoSocialClient(SocialProvider);

#[async_trait]
impl SocialAuthClient for EchoSocialClient {
    async fn fetch_profile(&self, code: &str, _state: Option<&str>) -> DomainResult<SocialProfile> {
        Ok(SocialProfile {
            provider: self.0,
            social_id: code.to_string(),
            profile_url: None,
        })
    }
}

struct FixedDataSource;

#[async_trait]
impl VaccinationDataSource for FixedDataSource {
    async fn fetch_korea(&self, target_date: NaiveDate) -> DomainResult<Vec<KoreaVaccinationRecord>> {
        Ok(vec![
            KoreaVaccinationRecord {
                base_date: target_date,
                sido: "전국".to_string(),
                accumulated_first_cnt: 15_000_000,
                accumulated_second_cnt: 6_000_000,
                first_cnt: 100_000,
                second_cnt: 50_000,
                total_first_cnt: 15_100_000,
                total_second_cnt: 6_050_000,
            },
            KoreaVaccinationRecord {
                base_date: target_date,
                sido: "서울특별시".to_string(),
                accumulated_first_cnt: 2_900_000,
                accumulated_second_cnt: 1_100_000,
                first_cnt: 20_000,
                second_cnt: 10_000,
                total_first_cnt: 2_920_000,
                total_second_cnt: 1_110_000,
            },
        ])
    }

    async fn fetch_world(&self) -> DomainResult<Vec<WorldVaccinationRecord>> {
        Ok(vec![WorldVaccinationRecord {
            date: NaiveDate::from_ymd_opt(2021, 7, 13).unwrap(),
            people_vaccinated: Some(1_000_000_000),
            people_fully_vaccinated: Some(500_000_000),
        }])
    }
}

/// Setup test application with routes
fn setup_app() -> Router {
    let social = SocialAuthClients::new(
        Arc::new(EchoSocialClient(SocialProvider::Kakao)),
        Arc::new(EchoSocialClient(SocialProvider::Naver)),
    );
    let state = AppState::new(
        Repositories::in_memory(InMemoryStore::new()),
        social,
        Arc::new(FixedDataSource),
        JwtTokenProvider::new("test-secret", 1),
    );
    api::router(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, headers, json)
}

/// Logs in for the first time and returns the signup token
async fn first_login(app: &Router, provider: &str, code: &str) -> String {
    let (status, _, body) = send(
        app,
        Method::POST,
        "/api/v1/users/auth",
        None,
        Some(json!({ "socialProvider": provider, "authorizationCode": code })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstLogin"], true);
    body["signupToken"].as_str().unwrap().to_string()
}

/// Signs a user up and returns (user id, access token)
async fn signup(app: &Router, nickname: &str) -> (String, String) {
    let signup_token = first_login(app, "KAKAO", &format!("kakao-{}", nickname)).await;
    let (status, headers, body) = send(
        app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({
            "nickname": nickname,
            "ageRange": "TWENTIES",
            "signupToken": signup_token,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(headers[header::LOCATION], format!("/api/v1/users/{}", id));
    (id, body["accessToken"].as_str().unwrap().to_string())
}

async fn create_post(app: &Router, token: &str, vaccination_type: &str) -> String {
    let (status, headers, body) = send(
        app,
        Method::POST,
        "/api/v1/posts",
        Some(token),
        Some(json!({ "content": "second dose went fine", "vaccinationType": vaccination_type })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(headers[header::LOCATION], format!("/api/v1/posts/{}", id));
    id
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let (status, _, _) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_social_login_then_signup() {
    let app = setup_app();
    let login = json!({ "socialProvider": "KAKAO", "authorizationCode": "kakao-alice" });

    let (status, _, body) = send(&app, Method::POST, "/api/v1/users/auth", None, Some(login.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstLogin"], true);
    assert_eq!(body["socialId"], "kakao-alice");
    assert!(body["accessToken"].is_null());
    assert!(body["signupToken"].is_string());

    let (user_id, token) = signup(&app, "alice").await;

    let (status, _, body) = send(&app, Method::POST, "/api/v1/users/auth", None, Some(login)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstLogin"], false);
    assert_eq!(body["userId"], user_id.as_str());
    assert!(body["signupToken"].is_null());

    let (status, _, body) = send(&app, Method::GET, "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nickname"], "alice");
    assert_eq!(body["ageRange"], "TWENTIES");
}

#[tokio::test]
async fn test_duplicate_nickname_and_invalid_nickname() {
    let app = setup_app();
    signup(&app, "alice").await;
    let signup_token = first_login(&app, "NAVER", "naver-1").await;

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({
            "nickname": "alice",
            "ageRange": "THIRTIES",
            "signupToken": signup_token,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({
            "nickname": "not valid!",
            "ageRange": "THIRTIES",
            "signupToken": signup_token,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_requires_token_from_first_login() {
    let app = setup_app();
    let (_, access_token) = signup(&app, "alice").await;
    let forged = JwtTokenProvider::new("someone-elses-secret", 1)
        .create_signup_token(&SocialProfile {
            provider: SocialProvider::Kakao,
            social_id: "kakao-victim".to_string(),
            profile_url: None,
        })
        .unwrap();

    for signup_token in [forged, access_token] {
        let (status, _, _) = send(
            &app,
            Method::POST,
            "/api/v1/users",
            None,
            Some(json!({
                "nickname": "mallory",
                "ageRange": "THIRTIES",
                "signupToken": signup_token,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({
            "nickname": "mallory",
            "ageRange": "THIRTIES",
            "socialProvider": "KAKAO",
            "socialId": "kakao-victim",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_and_delete_me() {
    let app = setup_app();
    let (user_id, token) = signup(&app, "alice").await;

    let (status, _, _) = send(
        &app,
        Method::PUT,
        "/api/v1/users/me",
        Some(&token),
        Some(json!({ "nickname": "alice2", "shotVerified": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let uri = format!("/api/v1/users/{}", user_id);
    let (_, _, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(body["nickname"], "alice2");
    assert_eq!(body["shotVerified"], true);

    let (status, _, _) = send(&app, Method::DELETE, "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // the token outlives the account but no longer authenticates
    let (status, _, _) = send(&app, Method::GET, "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_endpoint_requires_token() {
    let app = setup_app();
    let body = json!({ "content": "hello", "vaccinationType": "PFIZER" });

    let (status, _, _) = send(&app, Method::POST, "/api/v1/posts", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, Method::POST, "/api/v1/posts", Some("garbage"), Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // optional auth still rejects a bad token
    let (status, _, _) = send(&app, Method::GET, "/api/v1/posts", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_post_lifecycle() {
    let app = setup_app();
    let (_, writer) = signup(&app, "writer").await;
    let (_, reader) = signup(&app, "reader").await;

    let post_id = create_post(&app, &writer, "PFIZER").await;
    let uri = format!("/api/v1/posts/{}", post_id);

    let (status, _, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["viewCount"], 1);
    assert_eq!(body["writer"]["nickname"], "writer");

    let (_, _, body) = send(&app, Method::GET, &uri, Some(&reader), None).await;
    assert_eq!(body["viewCount"], 2);

    let edit = json!({ "content": "edited", "vaccinationType": "MODERNA" });
    let (status, _, _) = send(&app, Method::PUT, &uri, Some(&reader), Some(edit.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _, _) = send(&app, Method::DELETE, &uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, Method::PUT, &uri, Some(&writer), Some(edit)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, _, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(body["content"], "edited");
    assert_eq!(body["vaccinationType"], "MODERNA");

    let (status, _, _) = send(&app, Method::DELETE, &uri, Some(&writer), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_post_is_not_found() {
    let app = setup_app();
    let uri = format!("/api/v1/posts/{}", uuid::Uuid::new_v4());

    let (status, _, body) = send(&app, Method::GET, &uri, None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_posts_by_vaccination_type() {
    let app = setup_app();
    let (_, token) = signup(&app, "writer").await;
    create_post(&app, &token, "PFIZER").await;
    create_post(&app, &token, "MODERNA").await;
    create_post(&app, &token, "PFIZER").await;

    let (_, _, body) = send(&app, Method::GET, "/api/v1/posts?vaccinationType=PFIZER", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, _, body) = send(&app, Method::GET, "/api/v1/posts?vaccinationType=ALL", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, _, body) = send(
        &app,
        Method::GET,
        "/api/v1/posts/paging?vaccinationType=ALL&offset=1&size=1",
        None,
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["vaccinationType"], "MODERNA");
}

#[tokio::test]
async fn test_comments_flow() {
    let app = setup_app();
    let (_, writer) = signup(&app, "writer").await;
    let (_, reader) = signup(&app, "reader").await;
    let post_id = create_post(&app, &writer, "JANSSEN").await;
    let comments_uri = format!("/api/v1/posts/{}/comments", post_id);

    let (status, headers, body) = send(
        &app,
        Method::POST,
        &comments_uri,
        Some(&reader),
        Some(json!({ "content": "thanks for sharing" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment_id = body["id"].as_str().unwrap().to_string();
    let comment_uri = format!("{}/{}", comments_uri, comment_id);
    assert_eq!(headers[header::LOCATION], comment_uri.as_str());

    let (status, _, _) = send(
        &app,
        Method::PUT,
        &comment_uri,
        Some(&writer),
        Some(json!({ "content": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, _, body) = send(&app, Method::GET, &comments_uri, None, None).await;
    assert_eq!(body[0]["content"], "thanks for sharing");
    assert_eq!(body[0]["writer"]["nickname"], "reader");

    let (_, _, body) = send(&app, Method::GET, "/api/v1/posts/me?filter=COMMENTER", Some(&reader), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _, _) = send(&app, Method::DELETE, &comment_uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let missing = format!("/api/v1/posts/{}/comments", uuid::Uuid::new_v4());
    let (status, _, _) = send(
        &app,
        Method::POST,
        &missing,
        Some(&reader),
        Some(json!({ "content": "hello?" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_twice_conflicts() {
    let app = setup_app();
    let (_, writer) = signup(&app, "writer").await;
    let (_, reader) = signup(&app, "reader").await;
    let post_id = create_post(&app, &writer, "ASTRAZENECA").await;
    let likes_uri = format!("/api/v1/posts/{}/likes", post_id);

    let (status, _, _) = send(&app, Method::DELETE, &likes_uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, headers, body) = send(&app, Method::POST, &likes_uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        headers[header::LOCATION],
        format!("{}/{}", likes_uri, body["id"].as_str().unwrap()).as_str()
    );

    let (status, _, _) = send(&app, Method::POST, &likes_uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let post_uri = format!("/api/v1/posts/{}", post_id);
    let (_, _, body) = send(&app, Method::GET, &post_uri, Some(&reader), None).await;
    assert_eq!(body["likeCount"], 1);
    assert_eq!(body["hasLiked"], true);

    let (_, _, body) = send(&app, Method::GET, "/api/v1/posts/me?filter=LIKER", Some(&reader), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _, _) = send(&app, Method::DELETE, &likes_uri, Some(&reader), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_vaccination_statistics_ingestion() {
    let app = setup_app();
    let (_, token) = signup(&app, "admin").await;
    let uri = "/api/v1/publicdatas/vaccinations?targetDate=2021-07-14";
    let world_uri = "/api/v1/publicdatas/vaccinations/world?targetDate=2021-07-14";

    let (status, _, body) = send(&app, Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _, _) = send(&app, Method::PUT, uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, Method::PUT, uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&app, Method::PUT, uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send(&app, Method::PUT, world_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&app, Method::PUT, world_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, _, body) = send(&app, Method::GET, uri, None, None).await;
    let regions: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["region"].as_str().unwrap())
        .collect();
    assert_eq!(regions, vec!["COUNTRY", "SEOUL", "WORLD"]);
    assert_eq!(body[0]["sido"], "전국");
    assert_eq!(body[0]["baseDate"], "2021-07-14");
}
