//! Error types for the type-mapping library.

use thiserror::Error;

/// Main error type for type-mapping operations.
#[derive(Error, Debug)]
pub enum TypeMapError {
    /// Configuration error (contradictory lookup, invalid facets, bad YAML values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A store type name carried a suffix that could not be parsed.
    #[error("Cannot parse store type '{store_type}': {message}")]
    Parse { store_type: String, message: String },

    /// A value of the wrong runtime type was handed to a mapping.
    #[error("Invalid value for {expected} mapping: got {actual}")]
    InvalidValue { expected: String, actual: String },

    /// IO error (config file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TypeMapError {
    /// Create a Parse error for a store type name.
    pub fn parse(store_type: impl Into<String>, message: impl Into<String>) -> Self {
        TypeMapError::Parse {
            store_type: store_type.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidValue error.
    pub fn invalid_value(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        TypeMapError::InvalidValue {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Process exit code used by the CLI for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            TypeMapError::Config(_) | TypeMapError::Yaml(_) => 2,
            TypeMapError::Parse { .. } | TypeMapError::InvalidValue { .. } => 3,
            TypeMapError::Io(_) | TypeMapError::Json(_) => 1,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for type-mapping operations.
pub type Result<T> = std::result::Result<T, TypeMapError>;
