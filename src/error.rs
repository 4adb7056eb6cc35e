use thiserror::Error;

/// Error types for the formula-explorer library.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Error while parsing, compiling or evaluating an expression.
    #[error("Expression error: {0}")]
    Expression(#[from] crate::expression::ExpressionError),

    /// A formula was rejected by catalog admission.
    #[error("Formula error: {0}")]
    Formula(#[from] crate::formula::FormulaError),

    /// Failure of an assistant exchange.
    #[cfg(feature = "assistant")]
    #[error("Assistant error: {0}")]
    Assistant(#[from] crate::assistant::AssistantError),

    /// Invalid x-range or sample count.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Formula not found in the catalog.
    #[error("Formula not found: {0}")]
    FormulaNotFound(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for formula-explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;

impl From<String> for ExplorerError {
    fn from(s: String) -> Self {
        ExplorerError::Other(s)
    }
}

impl From<&str> for ExplorerError {
    fn from(s: &str) -> Self {
        ExplorerError::Other(s.to_string())
    }
}
