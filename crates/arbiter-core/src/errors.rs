//! Error types shared by every arbiter component.

/// Arbiter errors.
#[derive(Debug, thiserror::Error)]
pub enum ArbiterError {
    /// Fatal startup failure (credentials, fixtures, config).
    #[error("startup failure: {message}")]
    Startup { message: String },

    /// Document, question set or model identifier is unknown.
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    /// External model client failed (timeout, rate limit, auth, bad payload).
    #[error("model {model_id} failed: {message}")]
    Upstream { model_id: u32, message: String },

    /// Judge requested before every respondent result is present.
    #[error("responses not ready for models: {missing:?}")]
    NotReady { missing: Vec<u32> },

    /// Caller supplied an unusable argument.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Uploaded file type cannot be read.
    #[error("unsupported file type: {file_name}")]
    UnsupportedFormat { file_name: String },

    /// Text extraction from a backing file failed.
    #[error("text extraction failed for {path}: {message}")]
    Extraction { path: String, message: String },

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArbiterError {
    pub fn not_found(what: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            what,
            key: key.to_string(),
        }
    }

    pub fn startup(message: impl Into<String>) -> Self {
        Self::Startup {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Startup { .. } => 2,
            _ => 1,
        }
    }

    /// Whether the caller can recover and retry with different input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Startup { .. })
    }
}

/// Result type for arbiter operations.
pub type ArbiterResult<T> = Result<T, ArbiterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_kind_and_key() {
        let err = ArbiterError::not_found("document", 7);
        assert_eq!(err.to_string(), "document not found: 7");
        assert_eq!(err.exit_code(), 1);
        assert!(err.is_recoverable());
    }

    #[test]
    fn startup_is_fatal() {
        let err = ArbiterError::startup("OPENAI_API_KEY is not set");
        assert_eq!(err.exit_code(), 2);
        assert!(!err.is_recoverable());
    }
}
