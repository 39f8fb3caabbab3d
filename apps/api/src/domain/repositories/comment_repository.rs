use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::post::Comment;

/// Repository trait for comments
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Save a comment (insert or update)
    async fn save(&self, comment: &Comment) -> Result<(), String>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, String>;

    /// Comments on a post, oldest first
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, String>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64, String>;

    /// Comment counts for several posts in one lookup; posts without
    /// comments are absent
    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, String>;

    async fn delete(&self, id: Uuid) -> Result<(), String>;
}
