// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod memory;
pub mod postgres_comment_repository;
pub mod postgres_like_repository;
pub mod postgres_post_repository;
pub mod postgres_statistic_repository;
pub mod postgres_user_repository;

pub use memory::InMemoryStore;
pub use postgres_comment_repository::PostgresCommentRepository;
pub use postgres_like_repository::PostgresLikeRepository;
pub use postgres_post_repository::PostgresPostRepository;
pub use postgres_statistic_repository::PostgresVaccinationStatisticRepository;
pub use postgres_user_repository::PostgresUserRepository;
