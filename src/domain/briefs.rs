use serde::{Deserialize, Serialize};

use super::ContentError;

/// Input for artist-bio generation: a free-form description of the artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BioBrief {
    pub prompt: String,
}

impl BioBrief {
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.prompt.trim().is_empty() {
            return Err(ContentError::validation("prompt must not be empty"));
        }
        Ok(())
    }
}

/// Input for social-post generation. All fields except `keywords` are
/// required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPostBrief {
    pub product: String,
    pub audience: String,
    pub tone: String,
    pub platform: String,
    #[serde(default)]
    pub keywords: Option<String>,
}

impl SocialPostBrief {
    pub fn validate(&self) -> Result<(), ContentError> {
        for (field, value) in [
            ("product", &self.product),
            ("audience", &self.audience),
            ("tone", &self.tone),
            ("platform", &self.platform),
        ] {
            if value.trim().is_empty() {
                return Err(ContentError::validation(format!(
                    "{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Parsed social-post output. Either side may be empty when the model did not
/// follow the requested response format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub caption: String,
    pub tagline: String,
}
