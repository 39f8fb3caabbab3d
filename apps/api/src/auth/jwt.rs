// JWT token creation and verification
// Bearer tokens issued after social login; HS256, configurable expiry

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::oauth::SocialProfile;
use crate::domain::user::SocialProvider;

/// Lifetime of the token handed out on a first social login
pub const SIGNUP_TOKEN_MINUTES: i64 = 10;

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user_id)
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

/// Claims of a signup token: the social identity a first login proved
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SignupClaims {
    /// Social account id (subject)
    pub sub: String,
    pub provider: SocialProvider,
    pub profile_url: Option<String>,
    pub exp: usize,
}

/// Signs and verifies access tokens with one shared secret.
/// Signup tokens use a key derived from the same secret, so neither kind
/// verifies as the other.
#[derive(Clone)]
pub struct JwtTokenProvider {
    secret: String,
    expiry: Duration,
}

impl JwtTokenProvider {
    pub fn new(secret: impl Into<String>, expiry_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiry: Duration::hours(expiry_hours),
        }
    }

    /// Creates a JWT token for a user
    ///
    /// # Example
    /// ```
    /// use cvi_api::auth::jwt::JwtTokenProvider;
    /// use uuid::Uuid;
    ///
    /// let provider = JwtTokenProvider::new("your-secret-key", 8);
    /// let user_id = Uuid::new_v4();
    /// let token = provider.create_token(user_id).expect("valid token");
    ///
    /// let claims = provider.verify_token(&token).expect("valid token");
    /// assert_eq!(claims.sub, user_id);
    /// ```
    pub fn create_token(&self, user_id: Uuid) -> Result<String, String> {
        let expiry = Utc::now() + self.expiry;
        let claims = Claims {
            sub: user_id,
            exp: expiry.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| e.to_string())
    }

    /// Verifies and decodes a JWT token; expired or foreign tokens fail
    pub fn verify_token(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| e.to_string())
    }

    /// Creates a short-lived token binding a first login's social profile
    pub fn create_signup_token(&self, profile: &SocialProfile) -> Result<String, String> {
        let expiry = Utc::now() + Duration::minutes(SIGNUP_TOKEN_MINUTES);
        let claims = SignupClaims {
            sub: profile.social_id.clone(),
            provider: profile.provider,
            profile_url: profile.profile_url.clone(),
            exp: expiry.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.signup_secret().as_ref()),
        )
        .map_err(|e| e.to_string())
    }

    /// Recovers the social profile from a signup token
    pub fn verify_signup_token(&self, token: &str) -> Result<SocialProfile, String> {
        let claims = decode::<SignupClaims>(
            token,
            &DecodingKey::from_secret(self.signup_secret().as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| e.to_string())?;

        Ok(SocialProfile {
            provider: claims.provider,
            social_id: claims.sub,
            profile_url: claims.profile_url,
        })
    }

    fn signup_secret(&self) -> String {
        format!("{}:signup", self.secret)
    }
}

impl std::fmt::Debug for JwtTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenProvider")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    fn provider() -> JwtTokenProvider {
        JwtTokenProvider::new(TEST_SECRET, 8)
    }

    #[test]
    fn create_and_verify_token() {
        let user_id = Uuid::new_v4();
        let token = provider().create_token(user_id).expect("valid token");

        let claims = provider().verify_token(&token).expect("valid verification");
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = provider().create_token(Uuid::new_v4()).expect("valid token");

        let result = JwtTokenProvider::new("wrong-secret", 8).verify_token(&token);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_token_fails() {
        let result = provider().verify_token("invalid.token.string");
        assert!(result.is_err());
    }

    #[test]
    fn expired_token_fails() {
        // Past the default 60s leeway
        let expired = JwtTokenProvider::new(TEST_SECRET, -1);
        let token = expired.create_token(Uuid::new_v4()).expect("valid token");

        assert!(provider().verify_token(&token).is_err());
    }

    #[test]
    fn token_expiry_set() {
        let token = provider().create_token(Uuid::new_v4()).expect("valid token");

        let claims = provider().verify_token(&token).expect("valid verification");
        let expiry_time = claims.exp as i64;
        let now = Utc::now().timestamp();
        let in_8_hours = (Utc::now() + Duration::hours(8)).timestamp();

        assert!(expiry_time > now);
        assert!(expiry_time <= in_8_hours + 10);
    }

    fn kakao_profile() -> SocialProfile {
        SocialProfile {
            provider: SocialProvider::Kakao,
            social_id: "12345".to_string(),
            profile_url: Some("http://img".to_string()),
        }
    }

    #[test]
    fn signup_token_carries_profile() {
        let token = provider()
            .create_signup_token(&kakao_profile())
            .expect("valid token");

        let profile = provider().verify_signup_token(&token).expect("valid verification");
        assert_eq!(profile, kakao_profile());
    }

    #[test]
    fn signup_token_expires_within_minutes() {
        let token = provider()
            .create_signup_token(&kakao_profile())
            .expect("valid token");

        let claims = decode::<SignupClaims>(
            &token,
            &DecodingKey::from_secret(format!("{}:signup", TEST_SECRET).as_ref()),
            &Validation::default(),
        )
        .expect("valid verification")
        .claims;
        let latest = (Utc::now() + Duration::minutes(SIGNUP_TOKEN_MINUTES)).timestamp();
        assert!(claims.exp as i64 <= latest + 10);
        assert!(claims.exp as i64 > Utc::now().timestamp());
    }

    #[test]
    fn access_and_signup_tokens_are_not_interchangeable() {
        let access = provider().create_token(Uuid::new_v4()).expect("valid token");
        let signup = provider()
            .create_signup_token(&kakao_profile())
            .expect("valid token");

        assert!(provider().verify_signup_token(&access).is_err());
        assert!(provider().verify_token(&signup).is_err());
    }

    #[test]
    fn signup_token_from_other_secret_fails() {
        let token = JwtTokenProvider::new("wrong-secret", 8)
            .create_signup_token(&kakao_profile())
            .expect("valid token");

        assert!(provider().verify_signup_token(&token).is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let debug = format!("{:?}", provider());
        assert!(!debug.contains(TEST_SECRET));
    }
}
