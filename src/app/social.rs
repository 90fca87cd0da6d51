use regex::Regex;

use crate::domain::{ContentError, SocialPost, SocialPostBrief};

use super::ContentDispatcher;

/// Renders a social-post brief into the fixed prompt template, dispatches it,
/// and parses the `Caption:` / `Tagline:` response markers.
#[derive(Clone)]
pub struct SocialPostGenerator {
    dispatcher: ContentDispatcher,
    caption_pattern: Regex,
    tagline_pattern: Regex,
}

impl SocialPostGenerator {
    pub fn new(dispatcher: ContentDispatcher) -> Result<Self, ContentError> {
        let caption_pattern = compile_marker_pattern("caption")?;
        let tagline_pattern = compile_marker_pattern("tagline")?;

        Ok(Self {
            dispatcher,
            caption_pattern,
            tagline_pattern,
        })
    }

    pub fn generate(&self, brief: &SocialPostBrief) -> Result<SocialPost, ContentError> {
        brief.validate()?;

        let content = self.dispatcher.generate(&build_prompt(brief))?;
        Ok(self.parse_response(&content.text))
    }

    /// A missing marker yields an empty field, not an error: the model not
    /// following the response format is not a generation failure.
    fn parse_response(&self, text: &str) -> SocialPost {
        SocialPost {
            caption: first_capture(&self.caption_pattern, text),
            tagline: first_capture(&self.tagline_pattern, text),
        }
    }
}

fn compile_marker_pattern(marker: &str) -> Result<Regex, ContentError> {
    Regex::new(&format!(r"(?i){marker}:\s*(.+)")).map_err(|err| {
        ContentError::internal(format!("failed to compile {marker} pattern: {err}"))
    })
}

fn first_capture(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|capture| capture.as_str().trim().to_string())
        .unwrap_or_default()
}

fn build_prompt(brief: &SocialPostBrief) -> String {
    let keywords = brief
        .keywords
        .as_deref()
        .map(str::trim)
        .filter(|keywords| !keywords.is_empty())
        .unwrap_or("N/A");

    format!(
        "Generate a social media post and a catchy tagline.\n\
         \n\
         Details:\n\
         - Product: {}\n\
         - Audience: {}\n\
         - Tone: {}\n\
         - Platform: {}\n\
         - Keywords: {}\n\
         \n\
         Respond in this format:\n\
         Caption: <caption>\n\
         Tagline: <tagline>\n",
        brief.product, brief.audience, brief.tone, brief.platform, keywords
    )
}
