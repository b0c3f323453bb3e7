use thiserror::Error;

/// Convenient result alias for the dynosim library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a modification key could not be found in the catalog.
    #[error("unknown modification: {key}{}", format_suggestions(.suggestions))]
    UnknownModification {
        key: String,
        suggestions: Vec<String>,
    },

    /// Raised when the same modification key appears more than once in a build.
    #[error("duplicate modification: {key}")]
    DuplicateModification { key: String },

    /// Raised when vehicle reference data fails validation.
    #[error("invalid vehicle: {message}")]
    InvalidVehicle { message: String },

    /// Raised when catalog reference data is malformed.
    #[error("invalid catalog entry: {message}")]
    InvalidCatalogEntry { message: String },

    /// Raised when a projection produces or receives a figure that breaks a
    /// physical invariant (non-positive horsepower, for example).
    #[error("invalid projection: {message}")]
    InvalidProjection { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_modification_without_suggestions_renders_plain_message() {
        let err = Error::UnknownModification {
            key: "intake-cai".to_string(),
            suggestions: vec![],
        };
        assert_eq!(err.to_string(), "unknown modification: intake-cai");
    }

    #[test]
    fn unknown_modification_with_one_suggestion_renders_did_you_mean() {
        let err = Error::UnknownModification {
            key: "intkae".to_string(),
            suggestions: vec!["intake".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown modification: intkae. Did you mean 'intake'?"
        );
    }

    #[test]
    fn unknown_modification_with_many_suggestions_lists_candidates() {
        let err = Error::UnknownModification {
            key: "tune".to_string(),
            suggestions: vec!["stage1-tune".to_string(), "stage2-tune".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown modification: tune. Did you mean one of: 'stage1-tune', 'stage2-tune'?"
        );
    }

    #[test]
    fn duplicate_modification_names_the_key() {
        let err = Error::DuplicateModification {
            key: "exhaust-catback".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate modification: exhaust-catback");
    }

    #[test]
    fn invalid_projection_carries_message() {
        let err = Error::InvalidProjection {
            message: "final horsepower must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid projection: final horsepower must be positive"
        );
    }
}
