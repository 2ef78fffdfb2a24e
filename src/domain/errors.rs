use thiserror::Error;

/// Failures the order operations can produce. Validation problems carry the
/// offending value so the HTTP layer can echo it back to the caller.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
