//! Error types for virtual schema SQL generation.

use thiserror::Error;

/// The main error type for dialect rendering and query rewriting.
#[derive(Debug, Error)]
pub enum VsError {
    /// Missing, contradictory or malformed adapter properties.
    #[error("{0}")]
    Config(String),

    /// Adapter notes missing or unreadable. The text tells the user to refresh the virtual schema.
    #[error("{0}")]
    Metadata(String),

    /// A construct the selected dialect cannot express.
    #[error("Cannot render {construct} in dialect {dialect}")]
    Unsupported {
        construct: String,
        dialect: &'static str,
    },

    /// Malformed node shape, e.g. a function with the wrong number of arguments.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Failure while talking to the foreign system.
    #[error("Foreign execution error: {0}")]
    Foreign(String),

    /// Unknown dialect name.
    #[error("Unknown SQL dialect: '{0}'")]
    UnknownDialect(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VsError {
    /// Create a generation error for a construct a dialect cannot render.
    pub fn unsupported(construct: impl Into<String>, dialect: &'static str) -> Self {
        Self::Unsupported {
            construct: construct.into(),
            dialect,
        }
    }

    /// Create an argument count error for a function.
    pub fn arity(function: impl std::fmt::Display, expected: &str, actual: usize) -> Self {
        Self::Generation(format!(
            "Function {} expects {} argument(s) but got {}",
            function, expected, actual
        ))
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a foreign execution error.
    pub fn foreign(message: impl Into<String>) -> Self {
        Self::Foreign(message.into())
    }
}

/// Result type alias for virtual schema operations.
pub type VsResult<T> = Result<T, VsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VsError::unsupported("GROUP_CONCAT with multiple arguments", "SQLSERVER");
        assert_eq!(
            err.to_string(),
            "Cannot render GROUP_CONCAT with multiple arguments in dialect SQLSERVER"
        );
    }

    #[test]
    fn test_arity_display() {
        let err = VsError::arity("LOCATE", "2 or 3", 1);
        assert_eq!(
            err.to_string(),
            "Generation error: Function LOCATE expects 2 or 3 argument(s) but got 1"
        );
    }
}
