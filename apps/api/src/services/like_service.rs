use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::find_acting_user;
use super::post_service::post_not_found;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::Like;
use crate::domain::repositories::{LikeRepository, PostRepository, UserRepository};

#[derive(Clone)]
pub struct LikeService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self { users, posts, likes }
    }

    /// One like per user and post; a second attempt is a duplicate
    pub async fn like(&self, post_id: Uuid, user_id: Uuid) -> DomainResult<Like> {
        find_acting_user(&self.users, user_id).await?;
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(post_not_found(post_id));
        }
        if self
            .likes
            .find_by_post_and_user(post_id, user_id)
            .await?
            .is_some()
        {
            return Err(already_liked());
        }

        let like = Like::new(post_id, user_id);
        self.likes.create(&like).await.map_err(|e| {
            if e.contains("duplicate") {
                already_liked()
            } else {
                DomainError::Repository(e)
            }
        })?;

        info!(%post_id, %user_id, "post liked");
        Ok(like)
    }

    pub async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> DomainResult<()> {
        find_acting_user(&self.users, user_id).await?;
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(post_not_found(post_id));
        }

        let like = self
            .likes
            .find_by_post_and_user(post_id, user_id)
            .await?
            .filter(|like| like.created_by(user_id))
            .ok_or_else(|| DomainError::not_found("Post was not liked by this user"))?;
        self.likes.delete(like.id).await?;

        info!(%post_id, %user_id, "post unliked");
        Ok(())
    }
}

fn already_liked() -> DomainError {
    DomainError::duplicate("Post already liked by this user")
}
