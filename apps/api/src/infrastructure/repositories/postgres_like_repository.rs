use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::post::Like;
use crate::domain::repositories::LikeRepository;

#[derive(Debug, FromRow)]
struct LikeRow {
    id: Uuid,
    post_id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<LikeRow> for Like {
    fn from(r: LikeRow) -> Self {
        Like {
            id: r.id,
            post_id: r.post_id,
            user_id: r.user_id,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL implementation of LikeRepository
///
/// Uniqueness per `(post_id, user_id)` is enforced by
/// `likes_post_user_unique`; its violation message contains "duplicate".
pub struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn create(&self, like: &Like) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO likes (id, post_id, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(like.id)
        .bind(like.post_id)
        .bind(like.user_id)
        .bind(like.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to create like: {}", e))?;

        Ok(())
    }

    async fn find_by_post_and_user(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Like>, String> {
        let row = sqlx::query_as::<_, LikeRow>(
            r#"
            SELECT id, post_id, user_id, created_at
            FROM likes
            WHERE post_id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find like: {}", e))?;

        Ok(row.map(Like::from))
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64, String> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Failed to count likes: {}", e))
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, String> {
        let counts = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT post_id, COUNT(*)
            FROM likes
            WHERE post_id = ANY($1)
            GROUP BY post_id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to count likes: {}", e))?;

        Ok(counts.into_iter().collect())
    }

    async fn find_liked_post_ids(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, String> {
        let liked = sqlx::query_scalar::<_, Uuid>(
            "SELECT post_id FROM likes WHERE user_id = $1 AND post_id = ANY($2)",
        )
        .bind(user_id)
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find liked posts: {}", e))?;

        Ok(liked.into_iter().collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete like: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Like not found: {}", id));
        }

        Ok(())
    }
}
