use crate::domain::{BioBrief, ContentError, GeneratedContent};

use super::ContentDispatcher;

/// Wraps a free-form artist description in the fixed bio template and
/// dispatches it. The produced text is trimmed.
#[derive(Clone)]
pub struct BioGenerator {
    dispatcher: ContentDispatcher,
}

impl BioGenerator {
    pub fn new(dispatcher: ContentDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn generate(&self, brief: &BioBrief) -> Result<GeneratedContent, ContentError> {
        brief.validate()?;

        let mut content = self.dispatcher.generate(&build_prompt(brief))?;
        content.text = content.text.trim().to_string();
        Ok(content)
    }
}

fn build_prompt(brief: &BioBrief) -> String {
    format!(
        "Write a short professional artist bio for the given prompt.\n\
         Prompt: {}\n\
         \n\
         Each line shouldn't exceed 10 words.\n\
         Use third person point of view. Structure the bio in concise bullet points,\n\
         each separated by creative and relevant hashtags.\n\
         Highlight the artist's style 🖌️, preferred mediums 🎨, key themes 💭,\n\
         and impact or recognition 🌍. Keep the tone imaginative, fresh, engaging ✨ and funny.\n\
         Use expressive and artistic hashtags.\n",
        brief.prompt
    )
}

#[cfg(test)]
mod tests {
    use super::{BioGenerator, build_prompt};
    use crate::app::ContentDispatcher;
    use crate::domain::{BioBrief, ContentError};
    use crate::infra::llm::{ProviderChain, TextProvider};

    struct EchoProvider;

    impl TextProvider for EchoProvider {
        fn display_name(&self) -> &str {
            "Google Gemini"
        }

        fn complete(&self, _prompt: &str) -> Result<String, ContentError> {
            Ok("\n  • Paints dawn light on harbor walls 🖌️ #seaside\n".to_string())
        }
    }

    fn generator() -> BioGenerator {
        let mut chain = ProviderChain::new();
        chain
            .register(EchoProvider)
            .expect("provider registration should succeed");
        BioGenerator::new(ContentDispatcher::new(chain))
    }

    #[test]
    fn build_prompt_embeds_the_artist_description() {
        let prompt = build_prompt(&BioBrief {
            prompt: "muralist from Valparaíso".to_string(),
        });

        assert!(prompt.contains("Prompt: muralist from Valparaíso"));
        assert!(prompt.contains("third person point of view"));
        assert!(prompt.contains("artistic hashtags"));
    }

    #[test]
    fn generate_trims_the_produced_bio() {
        let content = generator()
            .generate(&BioBrief {
                prompt: "harbor painter".to_string(),
            })
            .expect("generation should succeed");

        assert_eq!(
            content.text,
            "• Paints dawn light on harbor walls 🖌️ #seaside"
        );
        assert_eq!(content.provider, "Google Gemini");
    }

    #[test]
    fn generate_rejects_blank_brief_before_dispatch() {
        let error = generator()
            .generate(&BioBrief {
                prompt: " ".to_string(),
            })
            .expect_err("blank prompt should fail validation");

        assert!(matches!(
            error,
            ContentError::Validation { message } if message == "prompt must not be empty"
        ));
    }
}
