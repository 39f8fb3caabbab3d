// Social login clients
// Exchange an OAuth authorization code for the provider's user profile

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::OAuthClientConfig;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::SocialProvider;

const KAKAO_TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";
const KAKAO_PROFILE_URL: &str = "https://kapi.kakao.com/v2/user/me";
const NAVER_TOKEN_URL: &str = "https://nid.naver.com/oauth2.0/token";
const NAVER_PROFILE_URL: &str = "https://openapi.naver.com/v1/nid/me";

/// Identity returned by a social provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialProfile {
    pub provider: SocialProvider,
    pub social_id: String,
    pub profile_url: Option<String>,
}

/// Client for one social login provider
#[async_trait]
pub trait SocialAuthClient: Send + Sync {
    /// Redeems `code` (and the CSRF `state`, where the provider wants it)
    /// and loads the user's profile
    async fn fetch_profile(&self, code: &str, state: Option<&str>) -> DomainResult<SocialProfile>;
}

/// Provider lookup used by the user service
#[derive(Clone)]
pub struct SocialAuthClients {
    kakao: Arc<dyn SocialAuthClient>,
    naver: Arc<dyn SocialAuthClient>,
}

impl SocialAuthClients {
    pub fn new(kakao: Arc<dyn SocialAuthClient>, naver: Arc<dyn SocialAuthClient>) -> Self {
        Self { kakao, naver }
    }

    /// Real HTTP clients for both providers sharing one connection pool
    pub fn from_config(http: Client, kakao: OAuthClientConfig, naver: OAuthClientConfig) -> Self {
        Self::new(
            Arc::new(KakaoAuthClient::new(http.clone(), kakao)),
            Arc::new(NaverAuthClient::new(http, naver)),
        )
    }

    pub fn get(&self, provider: SocialProvider) -> &dyn SocialAuthClient {
        match provider {
            SocialProvider::Kakao => self.kakao.as_ref(),
            SocialProvider::Naver => self.naver.as_ref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    fn into_access_token(self, provider: SocialProvider) -> DomainResult<String> {
        match self.access_token {
            Some(token) => Ok(token),
            None => {
                let reason = self
                    .error_description
                    .or(self.error)
                    .unwrap_or_else(|| "no access token".to_string());
                warn!(%provider, %reason, "social token exchange rejected");
                Err(DomainError::unauthorized(format!(
                    "{} login failed: {}",
                    provider, reason
                )))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct KakaoProfileResponse {
    id: i64,
    kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Deserialize)]
struct KakaoAccount {
    profile: Option<KakaoProfile>,
}

#[derive(Debug, Deserialize)]
struct KakaoProfile {
    profile_image_url: Option<String>,
}

impl From<KakaoProfileResponse> for SocialProfile {
    fn from(response: KakaoProfileResponse) -> Self {
        Self {
            provider: SocialProvider::Kakao,
            social_id: response.id.to_string(),
            profile_url: response
                .kakao_account
                .and_then(|account| account.profile)
                .and_then(|profile| profile.profile_image_url),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NaverProfileResponse {
    response: NaverProfile,
}

#[derive(Debug, Deserialize)]
struct NaverProfile {
    id: String,
    profile_image: Option<String>,
}

impl From<NaverProfileResponse> for SocialProfile {
    fn from(response: NaverProfileResponse) -> Self {
        Self {
            provider: SocialProvider::Naver,
            social_id: response.response.id,
            profile_url: response.response.profile_image,
        }
    }
}

fn external(provider: SocialProvider, e: reqwest::Error) -> DomainError {
    DomainError::ExternalApi(format!("{} request failed: {}", provider, e))
}

/// Kakao login over its REST API
pub struct KakaoAuthClient {
    http: Client,
    config: OAuthClientConfig,
}

impl KakaoAuthClient {
    pub fn new(http: Client, config: OAuthClientConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl SocialAuthClient for KakaoAuthClient {
    async fn fetch_profile(&self, code: &str, _state: Option<&str>) -> DomainResult<SocialProfile> {
        let provider = SocialProvider::Kakao;
        let token = self
            .http
            .post(KAKAO_TOKEN_URL)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| external(provider, e))?
            .json::<TokenResponse>()
            .await
            .map_err(|e| external(provider, e))?
            .into_access_token(provider)?;

        let profile = self
            .http
            .get(KAKAO_PROFILE_URL)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| external(provider, e))?
            .error_for_status()
            .map_err(|e| external(provider, e))?
            .json::<KakaoProfileResponse>()
            .await
            .map_err(|e| external(provider, e))?;

        debug!(social_id = profile.id, "kakao profile loaded");
        Ok(profile.into())
    }
}

/// Naver login over its REST API
pub struct NaverAuthClient {
    http: Client,
    config: OAuthClientConfig,
}

impl NaverAuthClient {
    pub fn new(http: Client, config: OAuthClientConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl SocialAuthClient for NaverAuthClient {
    async fn fetch_profile(&self, code: &str, state: Option<&str>) -> DomainResult<SocialProfile> {
        let provider = SocialProvider::Naver;
        let state = state.ok_or_else(|| DomainError::invalid("Naver login requires a state"))?;

        let token = self
            .http
            .get(NAVER_TOKEN_URL)
            .query(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("state", state),
            ])
            .send()
            .await
            .map_err(|e| external(provider, e))?
            .json::<TokenResponse>()
            .await
            .map_err(|e| external(provider, e))?
            .into_access_token(provider)?;

        let profile = self
            .http
            .get(NAVER_PROFILE_URL)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| external(provider, e))?
            .error_for_status()
            .map_err(|e| external(provider, e))?
            .json::<NaverProfileResponse>()
            .await
            .map_err(|e| external(provider, e))?;

        debug!(social_id = %profile.response.id, "naver profile loaded");
        Ok(profile.into())
    }
}
