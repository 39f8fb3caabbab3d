use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::repositories::UserRepository;
use crate::domain::user::{Nickname, SocialProvider, User};

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    nickname: String,
    age_range: String,
    shot_verified: bool,
    social_provider: String,
    social_id: String,
    social_profile_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let invalid = |e: crate::domain::DomainError| format!("Invalid user row {}: {}", r.id, e);
        Ok(User::from_persistence(
            r.id,
            Nickname::new(r.nickname.clone()).map_err(invalid)?,
            r.age_range.parse().map_err(invalid)?,
            r.shot_verified,
            r.social_provider.parse().map_err(invalid)?,
            r.social_id,
            r.social_profile_url,
            r.created_at,
        ))
    }
}

const SELECT_USER: &str = r#"
    SELECT id, nickname, age_range, shot_verified, social_provider,
           social_id, social_profile_url, created_at
    FROM users
"#;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<Uuid, String> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, nickname, age_range, shot_verified, social_provider,
                social_id, social_profile_url, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id())
        .bind(user.nickname().as_str())
        .bind(user.age_range().as_str())
        .bind(user.shot_verified())
        .bind(user.social_provider().as_str())
        .bind(user.social_id())
        .bind(user.social_profile_url())
        .bind(user.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to create user: {}", e))?;

        Ok(user.id())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to find user by id: {}", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, String> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = ANY($1)", SELECT_USER))
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| format!("Failed to find users by ids: {}", e))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_by_social(
        &self,
        provider: SocialProvider,
        social_id: &str,
    ) -> Result<Option<User>, String> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{} WHERE social_provider = $1 AND social_id = $2",
            SELECT_USER
        ))
        .bind(provider.as_str())
        .bind(social_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find user by social account: {}", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_nickname(&self, nickname: &Nickname) -> Result<Option<User>, String> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE nickname = $1", SELECT_USER))
            .bind(nickname.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to find user by nickname: {}", e))?;

        row.map(User::try_from).transpose()
    }

    async fn update(&self, user: &User) -> Result<(), String> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET nickname = $2, age_range = $3, shot_verified = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id())
        .bind(user.nickname().as_str())
        .bind(user.age_range().as_str())
        .bind(user.shot_verified())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update user: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("User not found: {}", user.id()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete user: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("User not found: {}", id));
        }

        Ok(())
    }
}
