// Error handling for the server API client

use thiserror::Error;

/// Type alias for client results
pub type CentResult<T> = Result<T, CentError>;

#[derive(Debug, Error)]
pub enum CentError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        /// Raw response body, kept for diagnostics.
        raw: String,
    },

    #[error("API error {code}: {message}")]
    Api { code: u32, message: String },
}

impl CentError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a transport error without an underlying cause
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping an underlying cause
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a protocol error carrying the raw response for diagnostics
    pub fn protocol(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// Create an API error from a server-reported code and message
    pub fn api(code: u32, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CentError::Validation { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, CentError::Transport { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, CentError::Protocol { .. })
    }

    /// Server-reported error code, if this is an API error
    pub fn api_code(&self) -> Option<u32> {
        match self {
            CentError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_code() {
        let err = CentError::api(102, "unknown channel");
        assert_eq!(err.api_code(), Some(102));
        assert_eq!(err.to_string(), "API error 102: unknown channel");
    }

    #[test]
    fn validation_error_has_no_code() {
        let err = CentError::validation("channel is required");
        assert!(err.is_validation());
        assert_eq!(err.api_code(), None);
    }

    #[test]
    fn protocol_error_keeps_raw_body() {
        let err = CentError::protocol("reply count mismatch", "[{}]");
        match err {
            CentError::Protocol { raw, .. } => assert_eq!(raw, "[{}]"),
            _ => panic!("expected protocol error"),
        }
    }
}
