use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::post::{Comment, Like, Post};
use crate::domain::public_data::{RegionPopulation, VaccinationStatistic};
use crate::domain::repositories::{
    CommentRepository, LikeRepository, PostQuery, PostRepository, UserRepository,
    VaccinationStatisticRepository,
};
use crate::domain::user::{Nickname, SocialProvider, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    likes: HashMap<Uuid, Like>,
    statistics: Vec<VaccinationStatistic>,
}

impl Tables {
    fn newest_first(&self, mut posts: Vec<Post>) -> Vec<Post> {
        posts.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        posts
    }

    fn delete_post_cascade(&mut self, post_id: Uuid) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, comment| comment.post_id() != post_id);
        self.likes.retain(|_, like| like.post_id != post_id);
    }
}

/// Process-local store implementing every repository trait
///
/// Mirrors the PostgreSQL constraints that matter to the services:
/// unique nickname, unique social account, unique like per user and post,
/// unique statistic per date and region, and cascading deletes.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> Result<Uuid, String> {
        let mut tables = self.tables.write().await;
        let conflict = tables.users.values().any(|existing| {
            existing.nickname() == user.nickname()
                || (existing.social_provider() == user.social_provider()
                    && existing.social_id() == user.social_id())
        });
        if conflict {
            return Err("duplicate key value violates unique constraint on users".to_string());
        }
        tables.users.insert(user.id(), user.clone());
        Ok(user.id())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, String> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn find_by_social(
        &self,
        provider: SocialProvider,
        social_id: &str,
    ) -> Result<Option<User>, String> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.social_provider() == provider && user.social_id() == social_id)
            .cloned())
    }

    async fn find_by_nickname(&self, nickname: &Nickname) -> Result<Option<User>, String> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|user| user.nickname() == nickname)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<(), String> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|existing| existing.id() != user.id() && existing.nickname() == user.nickname());
        if taken {
            return Err("duplicate key value violates unique constraint on users".to_string());
        }
        match tables.users.get_mut(&user.id()) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(format!("User not found: {}", user.id())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(format!("User not found: {}", id));
        }
        let owned: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|post| post.user_id() == id)
            .map(Post::id)
            .collect();
        for post_id in owned {
            tables.delete_post_cascade(post_id);
        }
        tables.comments.retain(|_, comment| comment.user_id() != id);
        tables.likes.retain(|_, like| like.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn save(&self, post: &Post) -> Result<(), String> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.user_id()) {
            return Err(format!("foreign key violation: user {}", post.user_id()));
        }
        // view_count is owned by increase_view_count; an edit never rewinds it
        let stored = match tables.posts.get(&post.id()) {
            Some(existing) => Post::from_persistence(
                existing.id(),
                existing.user_id(),
                post.content().to_string(),
                post.vaccination_type(),
                existing.view_count(),
                existing.created_at(),
                post.updated_at(),
            ),
            None => post.clone(),
        };
        tables.posts.insert(post.id(), stored);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, String> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_all(&self, query: PostQuery) -> Result<Vec<Post>, String> {
        let tables = self.tables.read().await;
        let matching = tables
            .posts
            .values()
            .filter(|post| {
                query
                    .vaccination_type
                    .map_or(true, |wanted| post.vaccination_type() == wanted)
            })
            .cloned()
            .collect();

        let offset = query.offset.unwrap_or(0).max(0) as usize;
        let limit = query.limit.map_or(usize::MAX, |limit| limit.max(0) as usize);
        Ok(tables
            .newest_first(matching)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn find_by_writer(&self, user_id: Uuid) -> Result<Vec<Post>, String> {
        let tables = self.tables.read().await;
        let posts = tables
            .posts
            .values()
            .filter(|post| post.user_id() == user_id)
            .cloned()
            .collect();
        Ok(tables.newest_first(posts))
    }

    async fn find_liked_by(&self, user_id: Uuid) -> Result<Vec<Post>, String> {
        let tables = self.tables.read().await;
        let posts = tables
            .likes
            .values()
            .filter(|like| like.user_id == user_id)
            .filter_map(|like| tables.posts.get(&like.post_id).cloned())
            .collect();
        Ok(tables.newest_first(posts))
    }

    async fn find_commented_by(&self, user_id: Uuid) -> Result<Vec<Post>, String> {
        let tables = self.tables.read().await;
        let mut post_ids: Vec<Uuid> = tables
            .comments
            .values()
            .filter(|comment| comment.user_id() == user_id)
            .map(Comment::post_id)
            .collect();
        post_ids.sort();
        post_ids.dedup();

        let posts = post_ids
            .into_iter()
            .filter_map(|id| tables.posts.get(&id).cloned())
            .collect();
        Ok(tables.newest_first(posts))
    }

    async fn increase_view_count(&self, id: Uuid) -> Result<Option<i64>, String> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| {
            let views = post.view_count() + 1;
            *post = Post::from_persistence(
                post.id(),
                post.user_id(),
                post.content().to_string(),
                post.vaccination_type(),
                views,
                post.created_at(),
                post.updated_at(),
            );
            views
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(format!("Post not found: {}", id));
        }
        tables.delete_post_cascade(id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn save(&self, comment: &Comment) -> Result<(), String> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id()) {
            return Err(format!("foreign key violation: post {}", comment.post_id()));
        }
        tables.comments.insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, String> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, String> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|comment| comment.post_id() == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(comments)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64, String> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|comment| comment.post_id() == post_id)
            .count() as i64)
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, String> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for comment in tables.comments.values() {
            if post_ids.contains(&comment.post_id()) {
                *counts.entry(comment.post_id()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        match self.tables.write().await.comments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(format!("Comment not found: {}", id)),
        }
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn create(&self, like: &Like) -> Result<(), String> {
        let mut tables = self.tables.write().await;
        let exists = tables
            .likes
            .values()
            .any(|existing| existing.post_id == like.post_id && existing.user_id == like.user_id);
        if exists {
            return Err("duplicate key value violates unique constraint on likes".to_string());
        }
        tables.likes.insert(like.id, like.clone());
        Ok(())
    }

    async fn find_by_post_and_user(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Like>, String> {
        Ok(self
            .tables
            .read()
            .await
            .likes
            .values()
            .find(|like| like.post_id == post_id && like.user_id == user_id)
            .cloned())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64, String> {
        let tables = self.tables.read().await;
        Ok(tables.likes.values().filter(|like| like.post_id == post_id).count() as i64)
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, String> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for like in tables.likes.values() {
            if post_ids.contains(&like.post_id) {
                *counts.entry(like.post_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn find_liked_post_ids(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, String> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .values()
            .filter(|like| like.user_id == user_id && post_ids.contains(&like.post_id))
            .map(|like| like.post_id)
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        match self.tables.write().await.likes.remove(&id) {
            Some(_) => Ok(()),
            None => Err(format!("Like not found: {}", id)),
        }
    }
}

#[async_trait]
impl VaccinationStatisticRepository for InMemoryStore {
    async fn save_all(&self, statistics: &[VaccinationStatistic]) -> Result<(), String> {
        let mut tables = self.tables.write().await;
        let clash = statistics.iter().any(|new| {
            tables
                .statistics
                .iter()
                .any(|old| old.base_date == new.base_date && old.region == new.region)
        });
        if clash {
            return Err(
                "duplicate key value violates unique constraint on vaccination_statistics"
                    .to_string(),
            );
        }
        tables.statistics.extend_from_slice(statistics);
        Ok(())
    }

    async fn find_by_base_date(
        &self,
        base_date: NaiveDate,
    ) -> Result<Vec<VaccinationStatistic>, String> {
        let tables = self.tables.read().await;
        let mut rows: Vec<VaccinationStatistic> = tables
            .statistics
            .iter()
            .filter(|row| row.base_date == base_date)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.region);
        Ok(rows)
    }

    async fn exists_by_base_date(
        &self,
        base_date: NaiveDate,
        regions: &[RegionPopulation],
    ) -> Result<bool, String> {
        let tables = self.tables.read().await;
        Ok(tables
            .statistics
            .iter()
            .any(|row| row.base_date == base_date && regions.contains(&row.region)))
    }
}
