use std::sync::Arc;

use crate::domain::ContentError;

use super::{CohereProvider, GeminiProvider, OpenAiProvider, TextProvider};

/// The ordered provider list, fixed at process start. Position in the chain
/// is the precedence rule: dispatch tries providers front to back and the
/// first success wins.
#[derive(Default, Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn TextProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the chain from the environment in declared order: Google
    /// Gemini, Google Gemini (Backup), Cohere, OpenAI. Providers without a
    /// usable credential (absent, blank, or the placeholder value) are left
    /// out of the chain entirely — never invoked, never listed, no error
    /// recorded.
    pub fn from_env() -> Result<Self, ContentError> {
        let mut chain = Self::new();

        if let Some(provider) = GeminiProvider::primary_from_env()? {
            chain.register(provider)?;
        }
        if let Some(provider) = GeminiProvider::backup_from_env()? {
            chain.register(provider)?;
        }
        if let Some(provider) = CohereProvider::from_env()? {
            chain.register(provider)?;
        }
        if let Some(provider) = OpenAiProvider::from_env()? {
            chain.register(provider)?;
        }

        Ok(chain)
    }

    pub fn register<P>(&mut self, provider: P) -> Result<(), ContentError>
    where
        P: TextProvider + 'static,
    {
        self.register_shared(Arc::new(provider))
    }

    pub fn register_shared(&mut self, provider: Arc<dyn TextProvider>) -> Result<(), ContentError> {
        let display_name = provider.display_name().trim();
        if display_name.is_empty() {
            return Err(ContentError::validation(
                "provider display name must not be empty",
            ));
        }
        if self
            .providers
            .iter()
            .any(|existing| existing.display_name() == display_name)
        {
            return Err(ContentError::validation(format!(
                "provider '{display_name}' is already registered"
            )));
        }

        self.providers.push(provider);
        Ok(())
    }

    /// Display names of all configured providers, in declared order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|provider| provider.display_name().to_string())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TextProvider>> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
