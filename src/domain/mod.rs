mod briefs;
mod content;
mod errors;

pub use briefs::{BioBrief, SocialPost, SocialPostBrief};
pub use content::GeneratedContent;
pub use errors::{ContentError, ProviderFailure};
