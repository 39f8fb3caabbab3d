use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::{Nickname, SocialProvider, User};

/// Repository trait for User aggregate
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create(&self, user: &User) -> Result<Uuid, String>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String>;

    /// Every user among `ids` that exists, in no particular order
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, String>;

    /// Find the user registered with a social account
    async fn find_by_social(
        &self,
        provider: SocialProvider,
        social_id: &str,
    ) -> Result<Option<User>, String>;

    /// Find a user by nickname
    async fn find_by_nickname(&self, nickname: &Nickname) -> Result<Option<User>, String>;

    /// Persist profile changes
    async fn update(&self, user: &User) -> Result<(), String>;

    /// Delete a user and everything they wrote
    async fn delete(&self, id: Uuid) -> Result<(), String>;
}
