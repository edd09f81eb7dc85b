//! Error types for route compilation.

use thiserror::Error;

/// Result alias for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors raised while building route candidates.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The compiled expression was rejected by the regex engine.
    #[error("invalid route pattern")]
    InvalidPattern {
        /// Raw pattern as declared.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },
}

impl RouterError {
    /// Raw pattern tied to the failure.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::InvalidPattern { pattern, .. } => pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_pattern_exposes_context() {
        let err = RouterError::InvalidPattern {
            pattern: "/a(".to_string(),
            source: regex::Error::Syntax("unclosed group".to_string()),
        };

        assert_eq!(err.to_string(), "invalid route pattern");
        assert_eq!(err.pattern(), "/a(");
        assert!(err.source().is_some());
    }
}
