//! Shared application state handed to every handler.

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::jwt::JwtTokenProvider;
use crate::auth::oauth::SocialAuthClients;
use crate::domain::public_data::VaccinationDataSource;
use crate::domain::repositories::{
    CommentRepository, LikeRepository, PostRepository, UserRepository,
    VaccinationStatisticRepository,
};
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresCommentRepository, PostgresLikeRepository, PostgresPostRepository,
    PostgresUserRepository, PostgresVaccinationStatisticRepository,
};
use crate::services::{CommentService, LikeService, PostService, PublicDataService, UserService};

/// One handle per repository trait, all backed by the same storage
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub statistics: Arc<dyn VaccinationStatisticRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            posts: Arc::new(PostgresPostRepository::new(pool.clone())),
            comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
            likes: Arc::new(PostgresLikeRepository::new(pool.clone())),
            statistics: Arc::new(PostgresVaccinationStatisticRepository::new(pool)),
        }
    }

    pub fn in_memory(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            likes: store.clone(),
            statistics: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
    pub public_data: PublicDataService,
    pub tokens: JwtTokenProvider,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        social: SocialAuthClients,
        source: Arc<dyn VaccinationDataSource>,
        tokens: JwtTokenProvider,
    ) -> Self {
        let Repositories {
            users,
            posts,
            comments,
            likes,
            statistics,
        } = repositories;

        Self {
            users: UserService::new(users.clone(), social, tokens.clone()),
            posts: PostService::new(
                users.clone(),
                posts.clone(),
                comments.clone(),
                likes.clone(),
            ),
            comments: CommentService::new(users.clone(), posts.clone(), comments),
            likes: LikeService::new(users, posts, likes),
            public_data: PublicDataService::new(statistics, source),
            tokens,
        }
    }
}

impl FromRef<AppState> for JwtTokenProvider {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
