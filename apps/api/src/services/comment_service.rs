use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::post_service::post_not_found;
use super::{find_acting_user, WriterCache};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::Comment;
use crate::domain::repositories::{CommentRepository, PostRepository, UserRepository};
use crate::domain::user::User;

/// A comment together with its writer
#[derive(Debug, Clone)]
pub struct CommentView {
    pub comment: Comment,
    pub writer: User,
}

#[derive(Clone)]
pub struct CommentService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    pub async fn create(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: String,
    ) -> DomainResult<CommentView> {
        let writer = find_acting_user(&self.users, user_id).await?;
        self.ensure_post_exists(post_id).await?;

        let comment = Comment::new(post_id, user_id, content)?;
        self.comments.save(&comment).await?;

        info!(comment_id = %comment.id(), %post_id, %user_id, "comment created");
        Ok(CommentView { comment, writer })
    }

    /// Comments on a post, oldest first
    pub async fn find_by_post(&self, post_id: Uuid) -> DomainResult<Vec<CommentView>> {
        self.ensure_post_exists(post_id).await?;

        let comments = self.comments.find_by_post(post_id).await?;
        let mut writers = WriterCache::new(&self.users);
        writers.preload(comments.iter().map(Comment::user_id)).await?;

        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            let writer = writers.get(comment.user_id()).await?;
            views.push(CommentView { comment, writer });
        }
        Ok(views)
    }

    pub async fn update(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
        content: String,
    ) -> DomainResult<()> {
        find_acting_user(&self.users, user_id).await?;
        let mut comment = self.find_comment(post_id, comment_id).await?;

        comment.update(user_id, content)?;
        self.comments.save(&comment).await?;

        info!(%comment_id, %user_id, "comment updated");
        Ok(())
    }

    pub async fn delete(&self, post_id: Uuid, comment_id: Uuid, user_id: Uuid) -> DomainResult<()> {
        find_acting_user(&self.users, user_id).await?;
        let comment = self.find_comment(post_id, comment_id).await?;

        comment.validate_author(user_id)?;
        self.comments.delete(comment_id).await?;

        info!(%comment_id, %user_id, "comment deleted");
        Ok(())
    }

    async fn ensure_post_exists(&self, post_id: Uuid) -> DomainResult<()> {
        match self.posts.find_by_id(post_id).await? {
            Some(_) => Ok(()),
            None => Err(post_not_found(post_id)),
        }
    }

    /// The comment must exist and hang off `post_id`
    async fn find_comment(&self, post_id: Uuid, comment_id: Uuid) -> DomainResult<Comment> {
        self.ensure_post_exists(post_id).await?;
        self.comments
            .find_by_id(comment_id)
            .await?
            .filter(|comment| comment.belongs_to(post_id))
            .ok_or_else(|| DomainError::not_found(format!("Comment not found: {}", comment_id)))
    }
}
