use crate::domain::ContentError;

/// Text substituted when a backend answers 2xx but the expected text field is
/// missing or empty. A malformed success still counts as a success and must
/// not trigger fallthrough to the next provider.
pub(crate) const NO_RESPONSE_PLACEHOLDER: &str = "No response generated";

/// One configured text-generation backend.
pub trait TextProvider: Send + Sync {
    /// Display name, unique within the active chain. Used in status listings
    /// and as the prefix of aggregate error entries.
    fn display_name(&self) -> &str;

    /// Produce text for the prompt, or fail with a transport/API error.
    fn complete(&self, prompt: &str) -> Result<String, ContentError>;
}
