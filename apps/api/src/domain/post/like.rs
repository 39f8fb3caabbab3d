use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user's endorsement of a post, unique per `(user_id, post_id)`
#[derive(Debug, Clone, PartialEq)]
pub struct Like {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(post_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at: Utc::now(),
        }
    }

    pub fn created_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
