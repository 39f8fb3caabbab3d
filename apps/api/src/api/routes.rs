use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{self, comments, likes, posts, public_data, users};
use crate::state::AppState;

/// Builds the application router with tracing and CORS layers
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    let api = Router::new()
        // Users
        .route("/users", post(users::signup))
        .route("/users/auth", post(users::login))
        .route(
            "/users/me",
            get(users::find_me)
                .put(users::update_me)
                .delete(users::delete_me),
        )
        .route("/users/:id", get(users::find_user))
        // Posts
        .route("/posts", post(posts::create_post).get(posts::find_posts))
        .route("/posts/paging", get(posts::find_posts_paged))
        .route("/posts/me", get(posts::find_my_posts))
        .route(
            "/posts/:id",
            get(posts::find_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        // Comments
        .route(
            "/posts/:id/comments",
            post(comments::create_comment).get(comments::find_comments),
        )
        .route(
            "/posts/:id/comments/:comment_id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        // Likes
        .route(
            "/posts/:id/likes",
            post(likes::like_post).delete(likes::unlike_post),
        )
        // Public data
        .route(
            "/publicdatas/vaccinations",
            get(public_data::find_vaccination_statistics)
                .put(public_data::save_vaccination_statistics),
        )
        .route(
            "/publicdatas/vaccinations/world",
            put(public_data::save_world_vaccination_statistics),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
