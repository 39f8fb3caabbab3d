use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::VaccinationType;
use crate::domain::errors::{DomainError, DomainResult};

/// Post aggregate root
///
/// A vaccination review written by one user.
///
/// # Invariants
/// - Content is not blank and at most `MAX_CONTENT_LENGTH` characters
/// - Vaccination type is concrete (never `All`)
/// - Only the writer may change or delete the post
///
/// # Example
/// ```
/// use cvi_api::domain::post::{Post, VaccinationType};
/// use uuid::Uuid;
///
/// let writer = Uuid::new_v4();
/// let post = Post::new(writer, "Mild fever after the second dose".to_string(), VaccinationType::Pfizer)
///     .expect("valid post");
///
/// assert!(post.is_written_by(writer));
/// assert_eq!(post.view_count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    id: Uuid,
    user_id: Uuid,
    content: String,
    vaccination_type: VaccinationType,
    view_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    pub const MAX_CONTENT_LENGTH: usize = 5000;

    pub fn new(
        user_id: Uuid,
        content: String,
        vaccination_type: VaccinationType,
    ) -> DomainResult<Self> {
        Self::validate(&content, vaccination_type)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            content,
            vaccination_type,
            view_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces content and vaccine on behalf of `editor_id`
    pub fn update(
        &mut self,
        editor_id: Uuid,
        content: String,
        vaccination_type: VaccinationType,
    ) -> DomainResult<()> {
        self.validate_author(editor_id)?;
        Self::validate(&content, vaccination_type)?;

        self.content = content;
        self.vaccination_type = vaccination_type;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn validate_author(&self, user_id: Uuid) -> DomainResult<()> {
        if self.is_written_by(user_id) {
            Ok(())
        } else {
            Err(DomainError::unauthorized(
                "Only the writer can modify this post",
            ))
        }
    }

    pub fn is_written_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    fn validate(content: &str, vaccination_type: VaccinationType) -> DomainResult<()> {
        if content.trim().is_empty() {
            return Err(DomainError::invalid("Post content cannot be empty"));
        }
        if content.chars().count() > Self::MAX_CONTENT_LENGTH {
            return Err(DomainError::invalid(format!(
                "Post content cannot exceed {} characters",
                Self::MAX_CONTENT_LENGTH
            )));
        }
        if vaccination_type == VaccinationType::All {
            return Err(DomainError::invalid(
                "Post must be tagged with a concrete vaccination type",
            ));
        }
        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn vaccination_type(&self) -> VaccinationType {
        self.vaccination_type
    }

    pub fn view_count(&self) -> i64 {
        self.view_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Post from persistence layer data
    ///
    /// Bypasses validation; only for repository implementations.
    pub fn from_persistence(
        id: Uuid,
        user_id: Uuid,
        content: String,
        vaccination_type: VaccinationType,
        view_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            content,
            vaccination_type,
            view_count,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(writer: Uuid) -> Post {
        Post::new(writer, "first dose done".to_string(), VaccinationType::Moderna)
            .expect("valid post")
    }

    #[test]
    fn new_post_starts_with_zero_views() {
        let post = post(Uuid::new_v4());
        assert_eq!(post.view_count(), 0);
        assert_eq!(post.created_at(), post.updated_at());
    }

    #[test]
    fn blank_content_is_rejected() {
        let result = Post::new(Uuid::new_v4(), "   ".to_string(), VaccinationType::Pfizer);
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn too_long_content_is_rejected() {
        let content = "a".repeat(Post::MAX_CONTENT_LENGTH + 1);
        let result = Post::new(Uuid::new_v4(), content, VaccinationType::Pfizer);
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn all_is_not_a_storable_type() {
        let result = Post::new(Uuid::new_v4(), "content".to_string(), VaccinationType::All);
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn writer_can_update() {
        let writer = Uuid::new_v4();
        let mut post = post(writer);

        post.update(writer, "second dose done".to_string(), VaccinationType::Janssen)
            .expect("writer may update");

        assert_eq!(post.content(), "second dose done");
        assert_eq!(post.vaccination_type(), VaccinationType::Janssen);
    }

    #[test]
    fn other_user_cannot_update() {
        let mut post = post(Uuid::new_v4());
        let result = post.update(
            Uuid::new_v4(),
            "hijacked".to_string(),
            VaccinationType::Pfizer,
        );

        assert!(matches!(result, Err(DomainError::Unauthorized(_))));
        assert_eq!(post.content(), "first dose done");
    }

    #[test]
    fn validate_author() {
        let writer = Uuid::new_v4();
        let post = post(writer);
        assert!(post.validate_author(writer).is_ok());
        assert!(post.validate_author(Uuid::new_v4()).is_err());
    }
}
