use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::post::Post;
use crate::domain::repositories::{PostQuery, PostRepository};

#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    content: String,
    vaccination_type: String,
    view_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = String;

    fn try_from(r: PostRow) -> Result<Self, Self::Error> {
        let vaccination_type = r
            .vaccination_type
            .parse()
            .map_err(|e| format!("Invalid post row {}: {}", r.id, e))?;

        Ok(Post::from_persistence(
            r.id,
            r.user_id,
            r.content,
            vaccination_type,
            r.view_count,
            r.created_at,
            r.updated_at,
        ))
    }
}

fn into_posts(rows: Vec<PostRow>) -> Result<Vec<Post>, String> {
    rows.into_iter().map(Post::try_from).collect()
}

/// PostgreSQL implementation of PostRepository
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn save(&self, post: &Post) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                id, user_id, content, vaccination_type, view_count, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                content = EXCLUDED.content,
                vaccination_type = EXCLUDED.vaccination_type,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(post.id())
        .bind(post.user_id())
        .bind(post.content())
        .bind(post.vaccination_type().as_str())
        .bind(post.view_count())
        .bind(post.created_at())
        .bind(post.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to save post: {}", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, String> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, content, vaccination_type, view_count, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find post by id: {}", e))?;

        row.map(Post::try_from).transpose()
    }

    async fn find_all(&self, query: PostQuery) -> Result<Vec<Post>, String> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, user_id, content, vaccination_type, view_count, created_at, updated_at \
             FROM posts",
        );
        if let Some(vaccination_type) = query.vaccination_type {
            builder
                .push(" WHERE vaccination_type = ")
                .push_bind(vaccination_type.as_str());
        }
        builder.push(" ORDER BY created_at DESC, id");
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        if let Some(offset) = query.offset {
            builder.push(" OFFSET ").push_bind(offset);
        }

        let rows = builder
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| format!("Failed to list posts: {}", e))?;

        into_posts(rows)
    }

    async fn find_by_writer(&self, user_id: Uuid) -> Result<Vec<Post>, String> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, content, vaccination_type, view_count, created_at, updated_at
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find posts by writer: {}", e))?;

        into_posts(rows)
    }

    async fn find_liked_by(&self, user_id: Uuid) -> Result<Vec<Post>, String> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.user_id, p.content, p.vaccination_type, p.view_count,
                   p.created_at, p.updated_at
            FROM posts p
            JOIN likes l ON l.post_id = p.id
            WHERE l.user_id = $1
            ORDER BY p.created_at DESC, p.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find liked posts: {}", e))?;

        into_posts(rows)
    }

    async fn find_commented_by(&self, user_id: Uuid) -> Result<Vec<Post>, String> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT p.id, p.user_id, p.content, p.vaccination_type, p.view_count,
                   p.created_at, p.updated_at
            FROM posts p
            WHERE EXISTS (
                SELECT 1 FROM comments c WHERE c.post_id = p.id AND c.user_id = $1
            )
            ORDER BY p.created_at DESC, p.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find commented posts: {}", e))?;

        into_posts(rows)
    }

    async fn increase_view_count(&self, id: Uuid) -> Result<Option<i64>, String> {
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE posts
            SET view_count = view_count + 1
            WHERE id = $1
            RETURNING view_count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to increase view count: {}", e))
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete post: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Post not found: {}", id));
        }

        Ok(())
    }
}
