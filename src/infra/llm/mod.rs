mod cohere;
mod env;
mod gemini;
mod openai;
mod provider;
mod provider_chain;
mod response_parsing;

pub use cohere::CohereProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use provider::TextProvider;
pub use provider_chain::ProviderChain;
