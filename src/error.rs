//! Error types for shardql.

use thiserror::Error;

/// The main error type for shardql operations.
#[derive(Debug, Error)]
pub enum ShardqlError {
    /// A caller-supplied argument is out of range or inconsistent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The dialect compiler cannot express the requested construct.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The query is not in a state where the operation makes sense.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Failed to parse a column or table expression.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShardqlError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }
}

/// Result type alias for shardql operations.
pub type ShardqlResult<T> = Result<T, ShardqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShardqlError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = ShardqlError::invalid_argument("page must be >= 1");
        assert_eq!(err.to_string(), "Invalid argument: page must be >= 1");
    }
}
