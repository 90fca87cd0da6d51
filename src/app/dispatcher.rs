use std::sync::Arc;

use crate::domain::{ContentError, GeneratedContent, ProviderFailure};
use crate::infra::llm::ProviderChain;

/// Tries providers in chain order and returns the first success.
///
/// Each call is independent: no retries within an attempt, no caching across
/// calls, no shared mutable state, and no cancellation once an attempt is in
/// flight. Per-provider errors never escape raw — the outcome is either
/// content or `Exhausted` carrying the ordered attempt list.
#[derive(Clone)]
pub struct ContentDispatcher {
    chain: Arc<ProviderChain>,
}

impl ContentDispatcher {
    pub fn new(chain: ProviderChain) -> Self {
        Self {
            chain: Arc::new(chain),
        }
    }

    /// Dispatches the prompt. The prompt is forwarded as-is; callers are
    /// expected to pre-validate and truncate.
    pub fn generate(&self, prompt: &str) -> Result<GeneratedContent, ContentError> {
        let mut attempts = Vec::new();

        for provider in self.chain.iter() {
            let name = provider.display_name();
            tracing::debug!(provider = name, "trying content provider");

            match provider.complete(prompt) {
                Ok(text) => {
                    tracing::debug!(provider = name, "content provider succeeded");
                    return Ok(GeneratedContent::new(text, name));
                }
                Err(error) => {
                    tracing::warn!(provider = name, %error, "content provider failed");
                    attempts.push(ProviderFailure::new(name, error.to_string()));
                }
            }
        }

        Err(ContentError::exhausted(attempts))
    }

    /// Display names of all configured providers, in declared order. Callers
    /// use this to decide whether to offer generation at all.
    pub fn configured_providers(&self) -> Vec<String> {
        self.chain.provider_names()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::ContentDispatcher;
    use crate::domain::{ContentError, ProviderFailure};
    use crate::infra::llm::{ProviderChain, TextProvider};

    struct StubProvider {
        display_name: &'static str,
        outcome: Result<&'static str, ContentError>,
        calls: Arc<AtomicUsize>,
    }

    impl StubProvider {
        fn succeeding(
            display_name: &'static str,
            text: &'static str,
            calls: &Arc<AtomicUsize>,
        ) -> Self {
            Self {
                display_name,
                outcome: Ok(text),
                calls: Arc::clone(calls),
            }
        }

        fn failing(
            display_name: &'static str,
            error: ContentError,
            calls: &Arc<AtomicUsize>,
        ) -> Self {
            Self {
                display_name,
                outcome: Err(error),
                calls: Arc::clone(calls),
            }
        }
    }

    impl TextProvider for StubProvider {
        fn display_name(&self) -> &str {
            self.display_name
        }

        fn complete(&self, _prompt: &str) -> Result<String, ContentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
                .as_ref()
                .map(|text| (*text).to_string())
                .map_err(Clone::clone)
        }
    }

    fn dispatcher(providers: Vec<StubProvider>) -> ContentDispatcher {
        let mut chain = ProviderChain::new();
        for provider in providers {
            chain
                .register(provider)
                .expect("provider registration should succeed");
        }
        ContentDispatcher::new(chain)
    }

    #[test]
    fn first_provider_success_wins_and_skips_the_rest() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(vec![
            StubProvider::succeeding("Google Gemini", "Canvas dreams", &first_calls),
            StubProvider::succeeding("OpenAI", "unused", &second_calls),
        ]);

        let content = dispatcher
            .generate("studio opening post")
            .expect("dispatch should succeed");

        assert_eq!(content.text, "Canvas dreams");
        assert_eq!(content.provider, "Google Gemini");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn falls_through_to_next_provider_and_discards_earlier_errors() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(vec![
            StubProvider::failing(
                "Google Gemini",
                ContentError::api(500, "Gemini API error: 500"),
                &first_calls,
            ),
            StubProvider::succeeding("Cohere", "Hello", &second_calls),
        ]);

        let content = dispatcher
            .generate("x")
            .expect("second provider should rescue the dispatch");

        assert_eq!(content.text, "Hello");
        assert_eq!(content.provider, "Cohere");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn exhaustion_collects_errors_in_attempt_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(vec![
            StubProvider::failing(
                "Google Gemini",
                ContentError::api(429, "Gemini API error: 429"),
                &calls,
            ),
            StubProvider::failing(
                "OpenAI",
                ContentError::api(500, "OpenAI API error: 500"),
                &calls,
            ),
        ]);

        let error = dispatcher
            .generate("x")
            .expect_err("all-failing chain should exhaust");

        assert!(matches!(
            error,
            ContentError::Exhausted { attempts } if attempts == vec![
                ProviderFailure::new("Google Gemini", "Gemini API error: 429"),
                ProviderFailure::new("OpenAI", "OpenAI API error: 500"),
            ]
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_chain_exhausts_with_empty_error_list() {
        let dispatcher = ContentDispatcher::new(ProviderChain::new());

        assert!(dispatcher.configured_providers().is_empty());

        let error = dispatcher
            .generate("x")
            .expect_err("empty chain should exhaust immediately");

        assert!(matches!(
            error,
            ContentError::Exhausted { attempts } if attempts.is_empty()
        ));
    }

    #[test]
    fn configured_providers_preserves_declared_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(vec![
            StubProvider::succeeding("Google Gemini", "a", &calls),
            StubProvider::succeeding("Google Gemini (Backup)", "b", &calls),
            StubProvider::succeeding("Cohere", "c", &calls),
        ]);

        assert_eq!(
            dispatcher.configured_providers(),
            vec!["Google Gemini", "Google Gemini (Backup)", "Cohere"]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
