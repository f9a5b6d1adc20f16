//! Error types for the rankings domain.
//!
//! Domain errors describe requests that cannot be turned into a ranking unit
//! at all: an unknown category, a subcategory that does not fit its category,
//! or a game outside the configured catalog.

/// Errors raised while interpreting ranking identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Category id does not name a known ranking kind
    #[error("Unknown ranking category: {0}")]
    UnknownCategory(String),

    /// Subcategory is not valid for the category
    #[error("Invalid subcategory '{sub_category}' for category '{category}': {reason}")]
    InvalidSubCategory {
        category: String,
        sub_category: String,
        reason: String,
    },

    /// Game is not part of the configured catalog
    #[error("Unsupported game: {0}")]
    UnsupportedGame(String),

    /// Category requires a game but none was supplied
    #[error("Category '{0}' requires a game")]
    GameRequired(String),
}

impl DomainError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            Self::InvalidSubCategory { .. } => "INVALID_SUB_CATEGORY",
            Self::UnsupportedGame(_) => "UNSUPPORTED_GAME",
            Self::GameRequired(_) => "GAME_REQUIRED",
        }
    }

    /// Shorthand for an invalid subcategory error
    pub fn invalid_sub_category(
        category: impl Into<String>,
        sub_category: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSubCategory {
            category: category.into(),
            sub_category: sub_category.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DomainError::UnknownCategory("x".into()).error_code(),
            "UNKNOWN_CATEGORY"
        );
        assert_eq!(
            DomainError::invalid_sub_category("timeTrial", "abc", "map id must be numeric")
                .error_code(),
            "INVALID_SUB_CATEGORY"
        );
    }
}
