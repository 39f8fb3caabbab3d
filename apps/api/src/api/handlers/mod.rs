// HTTP request handlers
// Thin adapters: parse the request, call a service, shape the response

pub mod comments;
pub mod likes;
pub mod posts;
pub mod public_data;
pub mod users;

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
