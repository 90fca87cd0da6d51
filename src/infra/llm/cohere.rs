use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::ContentError;

use super::env::{read_api_key, read_env_var, read_timeout_from_env, resolve_timeout_with_global_fallback};
use super::provider::NO_RESPONSE_PLACEHOLDER;
use super::response_parsing::{non_empty_trimmed, truncate_message};
use super::TextProvider;

const MODEL: &str = "command";
const DEFAULT_BASE_URL: &str = "https://api.cohere.ai";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u16 = 200;

const DISPLAY_NAME: &str = "Cohere";
const ERROR_LABEL: &str = "Cohere";

const ENV_API_KEY: &str = "ARTIZEN_COHERE_API_KEY";
const ENV_API_KEY_FALLBACK: &str = "COHERE_API_KEY";
const ENV_BASE_URL: &str = "ARTIZEN_COHERE_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "ARTIZEN_COHERE_TIMEOUT_SECS";
const ENV_GLOBAL_TIMEOUT_SECS: &str = "ARTIZEN_LLM_TIMEOUT_SECS";

/// Cohere `generate` adapter. The produced text is trimmed, per this
/// backend's convention.
pub struct CohereProvider {
    api_key: String,
    api_base_url: String,
    client: Client,
}

impl CohereProvider {
    /// Builds the provider, or `None` when no usable credential is set.
    pub fn from_env() -> Result<Option<Self>, ContentError> {
        let Some(api_key) = read_api_key(ENV_API_KEY, ENV_API_KEY_FALLBACK)? else {
            return Ok(None);
        };

        let api_base_url =
            read_env_var(ENV_BASE_URL)?.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = resolve_timeout_with_global_fallback(
            read_timeout_from_env(ENV_TIMEOUT_SECS)?,
            || read_timeout_from_env(ENV_GLOBAL_TIMEOUT_SECS),
            DEFAULT_TIMEOUT,
        )?;

        Self::with_config(api_key, api_base_url, timeout).map(Some)
    }

    pub fn with_config(
        api_key: impl Into<String>,
        api_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ContentError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ContentError::validation("Cohere API key must not be empty"));
        }

        let api_base_url = api_base_url.into();
        if api_base_url.trim().is_empty() {
            return Err(ContentError::validation(
                "Cohere API base URL must not be empty",
            ));
        }

        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            ContentError::internal(format!("failed to create Cohere HTTP client: {err}"))
        })?;

        Ok(Self {
            api_key,
            api_base_url,
            client,
        })
    }

    fn endpoint_url(&self) -> String {
        format!("{}/v1/generate", self.api_base_url.trim_end_matches('/'))
    }
}

impl TextProvider for CohereProvider {
    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn complete(&self, prompt: &str) -> Result<String, ContentError> {
        let payload = build_request_payload(prompt);

        let response = self
            .client
            .post(self.endpoint_url())
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        Ok(extract_text(&body).unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct CohereGenerateRequest {
    model: String,
    prompt: String,
    max_tokens: u16,
    temperature: f32,
    stop_sequences: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CohereGenerateResponse {
    #[serde(default)]
    generations: Vec<CohereGeneration>,
}

#[derive(Debug, Deserialize)]
struct CohereGeneration {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CohereErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
}

fn build_request_payload(prompt: &str) -> CohereGenerateRequest {
    CohereGenerateRequest {
        model: MODEL.to_string(),
        prompt: prompt.to_string(),
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        stop_sequences: Vec::new(),
    }
}

fn extract_text(body: &str) -> Option<String> {
    let response = serde_json::from_str::<CohereGenerateResponse>(body).ok()?;
    response
        .generations
        .first()?
        .text
        .as_deref()
        .and_then(non_empty_trimmed)
}

fn map_http_error(status: StatusCode, body: &str) -> ContentError {
    let detail = serde_json::from_str::<CohereErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty())
        .map(|message| truncate_message(&message));

    let code = status.as_u16();
    let message = match detail {
        Some(detail) => format!("{ERROR_LABEL} API error: {code}: {detail}"),
        None => format!("{ERROR_LABEL} API error: {code}"),
    };
    ContentError::api(code, message)
}

fn map_transport_error(error: reqwest::Error) -> ContentError {
    ContentError::transport(format!("{ERROR_LABEL} transport error: {error}"))
}
