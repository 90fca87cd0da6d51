use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::ContentError;

use super::env::{read_api_key, read_env_var, read_timeout_from_env, resolve_timeout_with_global_fallback};
use super::provider::NO_RESPONSE_PLACEHOLDER;
use super::response_parsing::{non_empty_raw, truncate_message};
use super::TextProvider;

const MODEL: &str = "gemini-1.5-flash-latest";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
const TEMPERATURE: f32 = 0.8;
const MAX_OUTPUT_TOKENS: u16 = 200;

const PRIMARY_DISPLAY_NAME: &str = "Google Gemini";
const PRIMARY_ERROR_LABEL: &str = "Gemini";
const BACKUP_DISPLAY_NAME: &str = "Google Gemini (Backup)";
const BACKUP_ERROR_LABEL: &str = "Gemini Backup";

const ENV_API_KEY: &str = "ARTIZEN_GEMINI_API_KEY";
const ENV_API_KEY_FALLBACK: &str = "GOOGLE_AI_API_KEY";
const ENV_BACKUP_API_KEY: &str = "ARTIZEN_GEMINI_BACKUP_API_KEY";
const ENV_BACKUP_API_KEY_FALLBACK: &str = "GOOGLE_AI_API_KEY_BACKUP";
const ENV_BASE_URL: &str = "ARTIZEN_GEMINI_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "ARTIZEN_GEMINI_TIMEOUT_SECS";
const ENV_GLOBAL_TIMEOUT_SECS: &str = "ARTIZEN_LLM_TIMEOUT_SECS";

/// Google Gemini `generateContent` adapter. The backup instance is the same
/// wire shape under a separate credential and display name, kept purely as a
/// redundant fallback slot in the chain.
#[derive(Debug)]
pub struct GeminiProvider {
    display_name: String,
    error_label: String,
    api_key: String,
    api_base_url: String,
    client: Client,
}

impl GeminiProvider {
    /// Builds the primary instance, or `None` when no usable credential is
    /// set (absent, blank, or the placeholder value).
    pub fn primary_from_env() -> Result<Option<Self>, ContentError> {
        Self::instance_from_env(
            PRIMARY_DISPLAY_NAME,
            PRIMARY_ERROR_LABEL,
            ENV_API_KEY,
            ENV_API_KEY_FALLBACK,
        )
    }

    /// Builds the backup instance, or `None` when unconfigured.
    pub fn backup_from_env() -> Result<Option<Self>, ContentError> {
        Self::instance_from_env(
            BACKUP_DISPLAY_NAME,
            BACKUP_ERROR_LABEL,
            ENV_BACKUP_API_KEY,
            ENV_BACKUP_API_KEY_FALLBACK,
        )
    }

    fn instance_from_env(
        display_name: &str,
        error_label: &str,
        env_key: &str,
        env_key_fallback: &str,
    ) -> Result<Option<Self>, ContentError> {
        let Some(api_key) = read_api_key(env_key, env_key_fallback)? else {
            return Ok(None);
        };

        let api_base_url =
            read_env_var(ENV_BASE_URL)?.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = resolve_timeout_with_global_fallback(
            read_timeout_from_env(ENV_TIMEOUT_SECS)?,
            || read_timeout_from_env(ENV_GLOBAL_TIMEOUT_SECS),
            DEFAULT_TIMEOUT,
        )?;

        Self::with_config(display_name, error_label, api_key, api_base_url, timeout).map(Some)
    }

    pub fn with_config(
        display_name: impl Into<String>,
        error_label: impl Into<String>,
        api_key: impl Into<String>,
        api_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ContentError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ContentError::validation("Gemini API key must not be empty"));
        }

        let api_base_url = api_base_url.into();
        if api_base_url.trim().is_empty() {
            return Err(ContentError::validation(
                "Gemini API base URL must not be empty",
            ));
        }

        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            ContentError::internal(format!("failed to create Gemini HTTP client: {err}"))
        })?;

        Ok(Self {
            display_name: display_name.into(),
            error_label: error_label.into(),
            api_key,
            api_base_url,
            client,
        })
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{MODEL}:generateContent",
            self.api_base_url.trim_end_matches('/')
        )
    }
}

impl TextProvider for GeminiProvider {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn complete(&self, prompt: &str) -> Result<String, ContentError> {
        let payload = build_request_payload(prompt);

        let response = self
            .client
            .post(self.endpoint_url())
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .map_err(|err| map_transport_error(&self.error_label, &err))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| map_transport_error(&self.error_label, &err))?;
        if !status.is_success() {
            return Err(map_http_error(&self.error_label, status, &body));
        }

        Ok(extract_text(&body).unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct GeminiGenerateRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u16,
}

#[derive(Debug, Deserialize)]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    #[serde(default)]
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
}

fn build_request_payload(prompt: &str) -> GeminiGenerateRequest {
    GeminiGenerateRequest {
        contents: vec![GeminiContent {
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GeminiGenerationConfig {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}

/// Extracts `candidates[0].content.parts[0].text`. A body that does not
/// decode, or decodes without a non-empty text field, yields `None` and the
/// caller substitutes the placeholder — a 2xx never becomes a failure.
fn extract_text(body: &str) -> Option<String> {
    let response = serde_json::from_str::<GeminiGenerateResponse>(body).ok()?;
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .first()?
        .text
        .as_deref()
        .and_then(non_empty_raw)
}

fn map_http_error(error_label: &str, status: StatusCode, body: &str) -> ContentError {
    let detail = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|detail| detail.message)
        .filter(|message| !message.trim().is_empty())
        .map(|message| truncate_message(&message));

    let code = status.as_u16();
    let message = match detail {
        Some(detail) => format!("{error_label} API error: {code}: {detail}"),
        None => format!("{error_label} API error: {code}"),
    };
    ContentError::api(code, message)
}

fn map_transport_error(error_label: &str, error: &reqwest::Error) -> ContentError {
    ContentError::transport(format!("{error_label} transport error: {error}"))
}
