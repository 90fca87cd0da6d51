use serde::{Deserialize, Serialize};

/// A successful dispatch outcome: the generated text and the display name of
/// the provider that produced it. Text is trimmed or untrimmed per the
/// producing provider's own convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub text: String,
    pub provider: String,
}

impl GeneratedContent {
    pub fn new(text: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
        }
    }
}
