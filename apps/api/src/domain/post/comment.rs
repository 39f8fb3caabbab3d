use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Comment left on a post
///
/// # Invariants
/// - Content is 1 to `MAX_CONTENT_LENGTH` characters and not blank
/// - Only the writer may change or delete the comment
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    id: Uuid,
    post_id: Uuid,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Comment {
    pub const MAX_CONTENT_LENGTH: usize = 300;

    pub fn new(post_id: Uuid, user_id: Uuid, content: String) -> DomainResult<Self> {
        Self::validate(&content)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(&mut self, editor_id: Uuid, content: String) -> DomainResult<()> {
        self.validate_author(editor_id)?;
        Self::validate(&content)?;

        self.content = content;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn validate_author(&self, user_id: Uuid) -> DomainResult<()> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(DomainError::unauthorized(
                "Only the writer can modify this comment",
            ))
        }
    }

    pub fn belongs_to(&self, post_id: Uuid) -> bool {
        self.post_id == post_id
    }

    fn validate(content: &str) -> DomainResult<()> {
        if content.trim().is_empty() {
            return Err(DomainError::invalid("Comment content cannot be empty"));
        }
        if content.chars().count() > Self::MAX_CONTENT_LENGTH {
            return Err(DomainError::invalid(format!(
                "Comment content cannot exceed {} characters",
                Self::MAX_CONTENT_LENGTH
            )));
        }
        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn from_persistence(
        id: Uuid,
        post_id: Uuid,
        user_id: Uuid,
        content: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            user_id,
            content,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_at_max_length_is_accepted() {
        let content = "가".repeat(Comment::MAX_CONTENT_LENGTH);
        assert!(Comment::new(Uuid::new_v4(), Uuid::new_v4(), content).is_ok());
    }

    #[test]
    fn comment_over_max_length_is_rejected() {
        let content = "a".repeat(Comment::MAX_CONTENT_LENGTH + 1);
        assert!(Comment::new(Uuid::new_v4(), Uuid::new_v4(), content).is_err());
    }

    #[test]
    fn blank_comment_is_rejected() {
        assert!(Comment::new(Uuid::new_v4(), Uuid::new_v4(), " \n".to_string()).is_err());
    }

    #[test]
    fn only_writer_updates() {
        let writer = Uuid::new_v4();
        let mut comment = Comment::new(Uuid::new_v4(), writer, "hello".to_string()).unwrap();

        assert!(matches!(
            comment.update(Uuid::new_v4(), "nope".to_string()),
            Err(DomainError::Unauthorized(_))
        ));
        comment.update(writer, "edited".to_string()).unwrap();
        assert_eq!(comment.content(), "edited");
    }

    #[test]
    fn belongs_to_its_post() {
        let post_id = Uuid::new_v4();
        let comment = Comment::new(post_id, Uuid::new_v4(), "hi".to_string()).unwrap();
        assert!(comment.belongs_to(post_id));
        assert!(!comment.belongs_to(Uuid::new_v4()));
    }
}
