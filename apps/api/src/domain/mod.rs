// Domain layer module exports
// Entities, value objects and repository contracts; no HTTP or SQL here

pub mod errors;
pub mod post;
pub mod public_data;
pub mod repositories;
pub mod user;

pub use errors::{DomainError, DomainResult};
