use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::post::Comment;
use crate::domain::repositories::CommentRepository;

#[derive(Debug, FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(r: CommentRow) -> Self {
        Comment::from_persistence(r.id, r.post_id, r.user_id, r.content, r.created_at, r.updated_at)
    }
}

/// PostgreSQL implementation of CommentRepository
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn save(&self, comment: &Comment) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, user_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                content = EXCLUDED.content,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(comment.id())
        .bind(comment.post_id())
        .bind(comment.user_id())
        .bind(comment.content())
        .bind(comment.created_at())
        .bind(comment.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to save comment: {}", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, String> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find comment by id: {}", e))?;

        Ok(row.map(Comment::from))
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, String> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find comments by post: {}", e))?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64, String> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Failed to count comments: {}", e))
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, String> {
        let counts = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT post_id, COUNT(*)
            FROM comments
            WHERE post_id = ANY($1)
            GROUP BY post_id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to count comments: {}", e))?;

        Ok(counts.into_iter().collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete comment: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Comment not found: {}", id));
        }

        Ok(())
    }
}
