use std::fmt;

use thiserror::Error;

/// One entry in the aggregate failure list: the display name of the provider
/// that was attempted and the message it failed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: String,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("validation failed: {message}")]
    Validation { message: String },
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("{message}")]
    Transport { message: String },
    #[error("all content providers failed ({} attempted)", .attempts.len())]
    Exhausted { attempts: Vec<ProviderFailure> },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ContentError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn exhausted(attempts: Vec<ProviderFailure>) -> Self {
        Self::Exhausted { attempts }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentError, ProviderFailure};

    #[test]
    fn provider_failure_displays_name_prefixed_entry() {
        let failure = ProviderFailure::new("Google Gemini", "Gemini API error: 500");

        assert_eq!(failure.to_string(), "Google Gemini: Gemini API error: 500");
    }

    #[test]
    fn api_error_keeps_status_in_message() {
        let error = ContentError::api(429, "Cohere API error: 429");

        assert!(matches!(error, ContentError::Api { status: 429, .. }));
        assert_eq!(error.to_string(), "Cohere API error: 429");
    }

    #[test]
    fn exhausted_reports_attempt_count() {
        let error = ContentError::exhausted(vec![
            ProviderFailure::new("Google Gemini", "Gemini API error: 500"),
            ProviderFailure::new("OpenAI", "OpenAI API error: 429"),
        ]);

        assert_eq!(
            error.to_string(),
            "all content providers failed (2 attempted)"
        );
    }

    #[test]
    fn exhausted_with_no_attempts_is_valid() {
        let error = ContentError::exhausted(Vec::new());

        assert!(matches!(
            error,
            ContentError::Exhausted { attempts } if attempts.is_empty()
        ));
    }
}
