// Repository contracts (ports)
// Implemented by the PostgreSQL and in-memory adapters in infrastructure

pub mod comment_repository;
pub mod like_repository;
pub mod post_repository;
pub mod statistic_repository;
pub mod user_repository;

pub use comment_repository::CommentRepository;
pub use like_repository::LikeRepository;
pub use post_repository::{PostQuery, PostRepository};
pub use statistic_repository::VaccinationStatisticRepository;
pub use user_repository::UserRepository;
