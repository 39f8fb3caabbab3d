// Application services (use cases)
// Each service owns the repository handles it needs and enforces
// cross-entity rules: existence, ownership and uniqueness checks

pub mod comment_service;
pub mod like_service;
pub mod post_service;
pub mod public_data_service;
pub mod scheduler;
pub mod user_service;

pub use comment_service::{CommentService, CommentView};
pub use like_service::LikeService;
pub use post_service::{PostDetails, PostService, PostView};
pub use public_data_service::PublicDataService;
pub use user_service::{LoginOutcome, SignupCommand, UpdateUserCommand, UserService};

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::UserRepository;
use crate::domain::user::User;

/// Loads the acting user; a token for a deleted account is no longer valid
pub(crate) async fn find_acting_user(
    users: &Arc<dyn UserRepository>,
    user_id: Uuid,
) -> DomainResult<User> {
    users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| DomainError::unauthorized(format!("Unknown user: {}", user_id)))
}

/// Per-request cache of writers so listings look each user up once
pub(crate) struct WriterCache<'a> {
    users: &'a Arc<dyn UserRepository>,
    loaded: HashMap<Uuid, User>,
}

impl<'a> WriterCache<'a> {
    pub(crate) fn new(users: &'a Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            loaded: HashMap::new(),
        }
    }

    /// Loads every writer not cached yet in a single repository call
    pub(crate) async fn preload(&mut self, user_ids: impl IntoIterator<Item = Uuid>) -> DomainResult<()> {
        let mut missing: Vec<Uuid> = user_ids
            .into_iter()
            .filter(|id| !self.loaded.contains_key(id))
            .collect();
        missing.sort();
        missing.dedup();
        if missing.is_empty() {
            return Ok(());
        }

        for user in self.users.find_by_ids(&missing).await? {
            self.loaded.insert(user.id(), user);
        }
        Ok(())
    }

    pub(crate) async fn get(&mut self, user_id: Uuid) -> DomainResult<User> {
        if let Some(user) = self.loaded.get(&user_id) {
            return Ok(user.clone());
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Writer not found: {}", user_id)))?;
        self.loaded.insert(user_id, user.clone());
        Ok(user)
    }
}
