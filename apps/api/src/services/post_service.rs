//! Post use cases: writing, reading, listing and the "my page" views.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::comment_service::CommentView;
use super::{find_acting_user, WriterCache};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::{MyPostFilter, Post, VaccinationType};
use crate::domain::repositories::{
    CommentRepository, LikeRepository, PostQuery, PostRepository, UserRepository,
};
use crate::domain::user::User;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A post as shown in lists: writer and counters resolved for one viewer
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub writer: User,
    pub like_count: i64,
    pub comment_count: i64,
    pub has_liked: bool,
}

/// A single post with its comments, oldest first
#[derive(Debug, Clone)]
pub struct PostDetails {
    pub view: PostView,
    pub comments: Vec<CommentView>,
}

#[derive(Clone)]
pub struct PostService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl PostService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
            likes,
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        content: String,
        vaccination_type: VaccinationType,
    ) -> DomainResult<PostView> {
        let writer = find_acting_user(&self.users, user_id).await?;
        let post = Post::new(writer.id(), content, vaccination_type)?;
        self.posts.save(&post).await?;

        info!(post_id = %post.id(), %user_id, %vaccination_type, "post created");
        Ok(PostView {
            post,
            writer,
            like_count: 0,
            comment_count: 0,
            has_liked: false,
        })
    }

    /// Reads one post and counts the view
    pub async fn find(&self, post_id: Uuid, viewer: Option<Uuid>) -> DomainResult<PostDetails> {
        self.posts
            .increase_view_count(post_id)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;
        let post = self.find_post(post_id).await?;

        let mut writers = WriterCache::new(&self.users);
        let comments = self.comments.find_by_post(post_id).await?;
        writers
            .preload(comments.iter().map(|comment| comment.user_id()).chain([post.user_id()]))
            .await?;
        let comment_count = comments.len() as i64;

        let mut comment_views = Vec::with_capacity(comments.len());
        for comment in comments {
            let writer = writers.get(comment.user_id()).await?;
            comment_views.push(CommentView { comment, writer });
        }

        let writer = writers.get(post.user_id()).await?;
        let like_count = self.likes.count_by_post(post_id).await?;
        let has_liked = self.has_liked(post_id, viewer).await?;

        Ok(PostDetails {
            view: PostView {
                post,
                writer,
                like_count,
                comment_count,
                has_liked,
            },
            comments: comment_views,
        })
    }

    /// Every post of one vaccine (`All` for every post), newest first
    pub async fn find_by_vaccination_type(
        &self,
        vaccination_type: VaccinationType,
        viewer: Option<Uuid>,
    ) -> DomainResult<Vec<PostView>> {
        let posts = self
            .posts
            .find_all(PostQuery::by_type(vaccination_type))
            .await?;
        self.to_views(posts, viewer).await
    }

    /// One page of `find_by_vaccination_type`; `size` is clamped to `1..=MAX_PAGE_SIZE`
    pub async fn find_by_vaccination_type_paged(
        &self,
        vaccination_type: VaccinationType,
        offset: i64,
        size: Option<i64>,
        viewer: Option<Uuid>,
    ) -> DomainResult<Vec<PostView>> {
        if offset < 0 {
            return Err(DomainError::invalid("Offset cannot be negative"));
        }
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let posts = self
            .posts
            .find_all(PostQuery::by_type(vaccination_type).paged(offset, size))
            .await?;
        self.to_views(posts, viewer).await
    }

    pub async fn find_mine(&self, user_id: Uuid, filter: MyPostFilter) -> DomainResult<Vec<PostView>> {
        find_acting_user(&self.users, user_id).await?;

        let posts = match filter {
            MyPostFilter::Writer => self.posts.find_by_writer(user_id).await?,
            MyPostFilter::Liker => self.posts.find_liked_by(user_id).await?,
            MyPostFilter::Commenter => self.posts.find_commented_by(user_id).await?,
        };
        self.to_views(posts, Some(user_id)).await
    }

    pub async fn update(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: String,
        vaccination_type: VaccinationType,
    ) -> DomainResult<()> {
        find_acting_user(&self.users, user_id).await?;
        let mut post = self.find_post(post_id).await?;

        post.update(user_id, content, vaccination_type)?;
        self.posts.save(&post).await?;

        info!(%post_id, %user_id, "post updated");
        Ok(())
    }

    pub async fn delete(&self, post_id: Uuid, user_id: Uuid) -> DomainResult<()> {
        find_acting_user(&self.users, user_id).await?;
        let post = self.find_post(post_id).await?;

        post.validate_author(user_id)?;
        self.posts.delete(post_id).await?;

        info!(%post_id, %user_id, "post deleted");
        Ok(())
    }

    async fn find_post(&self, post_id: Uuid) -> DomainResult<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| post_not_found(post_id))
    }

    async fn has_liked(&self, post_id: Uuid, viewer: Option<Uuid>) -> DomainResult<bool> {
        match viewer {
            Some(user_id) => Ok(self
                .likes
                .find_by_post_and_user(post_id, user_id)
                .await?
                .is_some()),
            None => Ok(false),
        }
    }

    /// Resolves writers and counters for a listing with a fixed number of
    /// repository calls, whatever the number of posts
    async fn to_views(&self, posts: Vec<Post>, viewer: Option<Uuid>) -> DomainResult<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let post_ids: Vec<Uuid> = posts.iter().map(Post::id).collect();

        let mut writers = WriterCache::new(&self.users);
        writers.preload(posts.iter().map(Post::user_id)).await?;
        let like_counts = self.likes.count_by_posts(&post_ids).await?;
        let comment_counts = self.comments.count_by_posts(&post_ids).await?;
        let liked = match viewer {
            Some(user_id) => self.likes.find_liked_post_ids(user_id, &post_ids).await?,
            None => HashSet::new(),
        };

        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            let writer = writers.get(post.user_id()).await?;
            views.push(PostView {
                like_count: like_counts.get(&post.id()).copied().unwrap_or(0),
                comment_count: comment_counts.get(&post.id()).copied().unwrap_or(0),
                has_liked: liked.contains(&post.id()),
                post,
                writer,
            });
        }

        Ok(views)
    }
}

pub(crate) fn post_not_found(post_id: Uuid) -> DomainError {
    DomainError::not_found(format!("Post not found: {}", post_id))
}
