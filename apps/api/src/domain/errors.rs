use thiserror::Error;

/// Errors raised by domain rules and use cases
///
/// Each variant maps onto one HTTP status in `api::errors`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Repositories report failures as plain strings; use cases lift them here.
impl From<String> for DomainError {
    fn from(message: String) -> Self {
        Self::Repository(message)
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
