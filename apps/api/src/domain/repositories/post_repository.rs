use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::post::{Post, VaccinationType};

/// Listing criteria for posts, newest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Concrete vaccine, or `None` for every post
    pub vaccination_type: Option<VaccinationType>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PostQuery {
    pub fn by_type(vaccination_type: VaccinationType) -> Self {
        Self {
            vaccination_type: vaccination_type.as_filter(),
            ..Self::default()
        }
    }

    pub fn paged(mut self, offset: i64, limit: i64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }
}

/// Repository trait for Post aggregate
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Save a post (insert or update)
    async fn save(&self, post: &Post) -> Result<(), String>;

    /// Find a post by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, String>;

    /// List posts matching `query`, newest first
    async fn find_all(&self, query: PostQuery) -> Result<Vec<Post>, String>;

    /// Posts written by a user, newest first
    async fn find_by_writer(&self, user_id: Uuid) -> Result<Vec<Post>, String>;

    /// Posts a user liked, newest first
    async fn find_liked_by(&self, user_id: Uuid) -> Result<Vec<Post>, String>;

    /// Posts a user commented on, newest first, each post once
    async fn find_commented_by(&self, user_id: Uuid) -> Result<Vec<Post>, String>;

    /// Atomically bump the view counter; returns the new count
    async fn increase_view_count(&self, id: Uuid) -> Result<Option<i64>, String>;

    /// Delete a post with its comments and likes
    async fn delete(&self, id: Uuid) -> Result<(), String>;
}
