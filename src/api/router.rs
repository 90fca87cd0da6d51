use axum::{
    Router,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::app::{BioGenerator, ContentDispatcher, SocialPostGenerator};
use crate::domain::{BioBrief, ContentError, ProviderFailure, SocialPostBrief};
use crate::infra::llm::ProviderChain;

/// Shared handler state: the dispatcher plus the two content generators
/// built on top of it.
#[derive(Clone)]
pub struct ApiState {
    dispatcher: ContentDispatcher,
    bio: BioGenerator,
    social: SocialPostGenerator,
}

impl ApiState {
    pub fn new(chain: ProviderChain) -> Result<Self, ContentError> {
        let dispatcher = ContentDispatcher::new(chain);
        let bio = BioGenerator::new(dispatcher.clone());
        let social = SocialPostGenerator::new(dispatcher.clone())?;

        Ok(Self {
            dispatcher,
            bio,
            social,
        })
    }
}

/// Builds the API router. CORS is fully permissive, matching the original
/// deployment where the endpoints were called straight from the browser.
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/providers", get(list_providers))
        .route("/api/generate", post(generate))
        .route("/api/generate-artist-bio", post(generate_artist_bio))
        .route("/api/generate-social-post", post(generate_social_post))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PromptRequest {
    prompt: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SocialPostRequest {
    product: String,
    audience: String,
    tone: String,
    platform: String,
    keywords: Option<String>,
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_providers(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(json!({
        "providers": state.dispatcher.configured_providers(),
    }))
}

/// Raw dispatch endpoint: surfaces the dispatcher result shape verbatim,
/// success flag included, so the caller sees the same outcome the in-browser
/// forms used to get.
async fn generate(
    State(state): State<ApiState>,
    Json(request): Json<PromptRequest>,
) -> Response {
    if request.prompt.trim().is_empty() {
        return bad_request("Prompt is required");
    }

    let dispatcher = state.dispatcher.clone();
    let outcome =
        tokio::task::spawn_blocking(move || dispatcher.generate(&request.prompt)).await;

    match outcome {
        Ok(Ok(content)) => Json(json!({
            "success": true,
            "content": content.text,
            "provider": content.provider,
        }))
        .into_response(),
        Ok(Err(ContentError::Exhausted { attempts })) => Json(json!({
            "success": false,
            "content": null,
            "provider": null,
            "errors": render_attempts(&attempts),
        }))
        .into_response(),
        Ok(Err(error)) => internal_error("Failed to generate content", &error),
        Err(join_error) => join_failure(&join_error),
    }
}

async fn generate_artist_bio(
    State(state): State<ApiState>,
    Json(request): Json<PromptRequest>,
) -> Response {
    let brief = BioBrief {
        prompt: request.prompt,
    };
    if brief.validate().is_err() {
        return bad_request("Prompt is required");
    }

    let generator = state.bio.clone();
    let outcome = tokio::task::spawn_blocking(move || generator.generate(&brief)).await;

    match outcome {
        Ok(Ok(content)) => Json(json!({ "bio": content.text })).into_response(),
        Ok(Err(ContentError::Exhausted { attempts })) => {
            exhausted_error("Failed to generate artist bio", &attempts)
        }
        Ok(Err(error)) => internal_error("Failed to generate artist bio", &error),
        Err(join_error) => join_failure(&join_error),
    }
}

async fn generate_social_post(
    State(state): State<ApiState>,
    Json(request): Json<SocialPostRequest>,
) -> Response {
    let brief = SocialPostBrief {
        product: request.product,
        audience: request.audience,
        tone: request.tone,
        platform: request.platform,
        keywords: request.keywords,
    };
    if brief.validate().is_err() {
        return bad_request("Missing required fields");
    }

    let generator = state.social.clone();
    let outcome = tokio::task::spawn_blocking(move || generator.generate(&brief)).await;

    match outcome {
        Ok(Ok(post)) => Json(json!({
            "caption": post.caption,
            "tagline": post.tagline,
        }))
        .into_response(),
        Ok(Err(ContentError::Exhausted { attempts })) => {
            exhausted_error("Failed to generate social media post", &attempts)
        }
        Ok(Err(error)) => internal_error("Failed to generate social media post", &error),
        Err(join_error) => join_failure(&join_error),
    }
}

fn render_attempts(attempts: &[ProviderFailure]) -> Vec<String> {
    attempts.iter().map(ToString::to_string).collect()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// The error list is surfaced verbatim; consumers render the entries without
/// further translation of backend status codes.
fn exhausted_error(message: &str, attempts: &[ProviderFailure]) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "errors": render_attempts(attempts),
        })),
    )
        .into_response()
}

fn internal_error(message: &str, error: &ContentError) -> Response {
    tracing::error!(%error, "generation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

fn join_failure(join_error: &tokio::task::JoinError) -> Response {
    tracing::error!(%join_error, "generation task failed to run");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Generation task failed" })),
    )
        .into_response()
}
