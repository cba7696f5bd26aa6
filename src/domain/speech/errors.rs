//! Speech Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No match found for token: {token}")]
    Unresolved { token: String },

    #[error("Failed to synthesize '{token}': {message}")]
    Synthesis { token: String, message: String },
}

impl ResolveError {
    pub fn token(&self) -> &str {
        match self {
            ResolveError::Unresolved { token } | ResolveError::Synthesis { token, .. } => token,
        }
    }
}
