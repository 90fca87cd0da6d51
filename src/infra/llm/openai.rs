use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::ContentError;

use super::env::{read_api_key, read_env_var, read_timeout_from_env, resolve_timeout_with_global_fallback};
use super::provider::NO_RESPONSE_PLACEHOLDER;
use super::response_parsing::{non_empty_raw, truncate_message};
use super::TextProvider;

const MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u16 = 200;

const DISPLAY_NAME: &str = "OpenAI";
const ERROR_LABEL: &str = "OpenAI";

const ENV_API_KEY: &str = "ARTIZEN_OPENAI_API_KEY";
const ENV_API_KEY_FALLBACK: &str = "OPENAI_API_KEY";
const ENV_BASE_URL: &str = "ARTIZEN_OPENAI_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "ARTIZEN_OPENAI_TIMEOUT_SECS";
const ENV_GLOBAL_TIMEOUT_SECS: &str = "ARTIZEN_LLM_TIMEOUT_SECS";

/// OpenAI chat-completions adapter.
pub struct OpenAiProvider {
    api_key: String,
    api_base_url: String,
    client: Client,
}

impl OpenAiProvider {
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
            return Err(ContentError::validation("OpenAI API key must not be empty"));
        }

        let api_base_url = api_base_url.into();
        if api_base_url.trim().is_empty() {
            return Err(ContentError::validation(
                "OpenAI API base URL must not be empty",
            ));
        }

        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            ContentError::internal(format!("failed to create OpenAI HTTP client: {err}"))
        })?;

        Ok(Self {
            api_key,
            api_base_url,
            client,
        })
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.api_base_url.trim_end_matches('/')
        )
    }
}

impl TextProvider for OpenAiProvider {
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
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiChatMessage>,
    temperature: f32,
    max_tokens: u16,
}

#[derive(Debug, Serialize)]
struct OpenAiChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    #[serde(default)]
    message: Option<OpenAiChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorEnvelope {
    #[serde(default)]
    error: Option<OpenAiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    #[serde(default)]
    message: String,
}

fn build_request_payload(prompt: &str) -> OpenAiChatRequest {
    OpenAiChatRequest {
        model: MODEL.to_string(),
        messages: vec![OpenAiChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

fn extract_text(body: &str) -> Option<String> {
    let response = serde_json::from_str::<OpenAiChatResponse>(body).ok()?;
    response
        .choices
        .first()?
        .message
        .as_ref()?
        .content
        .as_deref()
        .and_then(non_empty_raw)
}

fn map_http_error(status: StatusCode, body: &str) -> ContentError {
    let detail = serde_json::from_str::<OpenAiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|detail| detail.message)
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
