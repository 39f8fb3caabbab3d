use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::post::Like;

/// Repository trait for likes
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Insert a like; a second like for the same `(user, post)` must fail
    /// with an error message containing "duplicate"
    async fn create(&self, like: &Like) -> Result<(), String>;

    async fn find_by_post_and_user(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Like>, String>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64, String>;

    /// Like counts for several posts in one lookup; posts without likes
    /// are absent
    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, String>;

    /// Which of `post_ids` the user has liked
    async fn find_liked_post_ids(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, String>;

    async fn delete(&self, id: Uuid) -> Result<(), String>;
}
