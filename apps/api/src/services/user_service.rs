//! User use cases: social login, signup and profile management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::find_acting_user;
use crate::auth::jwt::JwtTokenProvider;
use crate::auth::oauth::{SocialAuthClients, SocialProfile};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::UserRepository;
use crate::domain::user::{AgeRange, Nickname, SocialProvider, User};

/// Result of redeeming a social login code
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Known account: here is its token
    Registered { user: User, access_token: String },
    /// First visit: the client must finish signup, presenting
    /// `signup_token` as proof of this profile
    FirstLogin {
        profile: SocialProfile,
        signup_token: String,
    },
}

#[derive(Debug, Clone)]
pub struct SignupCommand {
    pub nickname: String,
    pub age_range: AgeRange,
    /// Issued by `login` on a first visit
    pub signup_token: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    pub nickname: Option<String>,
    pub age_range: Option<AgeRange>,
    pub shot_verified: Option<bool>,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    social: SocialAuthClients,
    tokens: JwtTokenProvider,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        social: SocialAuthClients,
        tokens: JwtTokenProvider,
    ) -> Self {
        Self {
            users,
            social,
            tokens,
        }
    }

    pub async fn login(
        &self,
        provider: SocialProvider,
        code: &str,
        state: Option<&str>,
    ) -> DomainResult<LoginOutcome> {
        let profile = self.social.get(provider).fetch_profile(code, state).await?;

        match self
            .users
            .find_by_social(profile.provider, &profile.social_id)
            .await?
        {
            Some(user) => {
                let access_token = self.issue_token(&user)?;
                info!(user_id = %user.id(), %provider, "user logged in");
                Ok(LoginOutcome::Registered { user, access_token })
            }
            None => {
                let signup_token = self.tokens.create_signup_token(&profile).map_err(|e| {
                    DomainError::Repository(format!("Failed to create token: {}", e))
                })?;
                info!(%provider, "first social login, signup required");
                Ok(LoginOutcome::FirstLogin {
                    profile,
                    signup_token,
                })
            }
        }
    }

    pub async fn signup(&self, command: SignupCommand) -> DomainResult<(User, String)> {
        let profile = self
            .tokens
            .verify_signup_token(&command.signup_token)
            .map_err(|e| DomainError::unauthorized(format!("Invalid signup token: {}", e)))?;
        let nickname = Nickname::new(command.nickname)?;

        if self.users.find_by_nickname(&nickname).await?.is_some() {
            return Err(DomainError::duplicate(format!(
                "Nickname already taken: {}",
                nickname
            )));
        }
        if self
            .users
            .find_by_social(profile.provider, &profile.social_id)
            .await?
            .is_some()
        {
            return Err(DomainError::duplicate("Social account already registered"));
        }

        let user = User::new(
            nickname,
            command.age_range,
            profile.provider,
            profile.social_id,
            profile.profile_url,
        );
        self.users.create(&user).await.map_err(map_unique_violation)?;

        let access_token = self.issue_token(&user)?;
        info!(user_id = %user.id(), "user signed up");
        Ok((user, access_token))
    }

    pub async fn find(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User not found: {}", user_id)))
    }

    pub async fn find_me(&self, user_id: Uuid) -> DomainResult<User> {
        find_acting_user(&self.users, user_id).await
    }

    pub async fn update(&self, user_id: Uuid, command: UpdateUserCommand) -> DomainResult<()> {
        let mut user = find_acting_user(&self.users, user_id).await?;

        let nickname = command.nickname.map(Nickname::new).transpose()?;
        if let Some(nickname) = &nickname {
            if let Some(owner) = self.users.find_by_nickname(nickname).await? {
                if owner.id() != user_id {
                    return Err(DomainError::duplicate(format!(
                        "Nickname already taken: {}",
                        nickname
                    )));
                }
            }
        }

        user.update(nickname, command.age_range, command.shot_verified);
        self.users.update(&user).await.map_err(map_unique_violation)?;
        Ok(())
    }

    pub async fn delete(&self, user_id: Uuid) -> DomainResult<()> {
        find_acting_user(&self.users, user_id).await?;
        self.users.delete(user_id).await?;
        info!(%user_id, "user deleted");
        Ok(())
    }

    fn issue_token(&self, user: &User) -> DomainResult<String> {
        self.tokens
            .create_token(user.id())
            .map_err(|e| DomainError::Repository(format!("Failed to create token: {}", e)))
    }
}

/// A concurrent signup can still lose the race on the unique index
fn map_unique_violation(e: String) -> DomainError {
    if e.contains("duplicate") || e.contains("unique") {
        DomainError::duplicate("Nickname or social account already registered")
    } else {
        DomainError::Repository(e)
    }
}
