use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::{AgeRange, Nickname, SocialProvider};

/// Registered community member
///
/// A user is identified externally by `(social_provider, social_id)` and
/// internally by `id`. Nicknames are unique across users; that rule is
/// checked by the user service against the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: Uuid,
    nickname: Nickname,
    age_range: AgeRange,
    shot_verified: bool,
    social_provider: SocialProvider,
    social_id: String,
    social_profile_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user for a freshly completed social signup
    pub fn new(
        nickname: Nickname,
        age_range: AgeRange,
        social_provider: SocialProvider,
        social_id: String,
        social_profile_url: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            nickname,
            age_range,
            shot_verified: false,
            social_provider,
            social_id,
            social_profile_url,
            created_at: Utc::now(),
        }
    }

    /// Applies a profile edit. Fields left as `None` keep their value.
    pub fn update(
        &mut self,
        nickname: Option<Nickname>,
        age_range: Option<AgeRange>,
        shot_verified: Option<bool>,
    ) {
        if let Some(nickname) = nickname {
            self.nickname = nickname;
        }
        if let Some(age_range) = age_range {
            self.age_range = age_range;
        }
        if let Some(shot_verified) = shot_verified {
            self.shot_verified = shot_verified;
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    pub fn age_range(&self) -> AgeRange {
        self.age_range
    }

    pub fn shot_verified(&self) -> bool {
        self.shot_verified
    }

    pub fn social_provider(&self) -> SocialProvider {
        self.social_provider
    }

    pub fn social_id(&self) -> &str {
        &self.social_id
    }

    pub fn social_profile_url(&self) -> Option<&str> {
        self.social_profile_url.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs a User from persistence layer data
    ///
    /// Only to be used by repository implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        nickname: Nickname,
        age_range: AgeRange,
        shot_verified: bool,
        social_provider: SocialProvider,
        social_id: String,
        social_profile_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            nickname,
            age_range,
            shot_verified,
            social_provider,
            social_id,
            social_profile_url,
            created_at,
        }
    }
}
