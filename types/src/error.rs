use thiserror::Error;

/// Errors raised while constructing the shared value types.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("identity must not be empty")]
    EmptyIdentity,

    #[error("invalid identity: {0:?}")]
    InvalidIdentity(String),
}
