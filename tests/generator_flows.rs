//! Bio and social-post generation flows through a mocked provider backend.

use std::time::Duration;

use artizen::app::{BioGenerator, ContentDispatcher, SocialPostGenerator};
use artizen::domain::{BioBrief, ContentError, SocialPostBrief};
use artizen::infra::llm::{OpenAiProvider, ProviderChain};
use mockito::{Matcher, Server};
use serde_json::json;

fn dispatcher_backed_by(server: &Server, api_key: &str) -> ContentDispatcher {
    let mut chain = ProviderChain::new();
    chain
        .register(
            OpenAiProvider::with_config(api_key, server.url(), Duration::from_secs(2))
                .expect("provider should build"),
        )
        .expect("registration should succeed");
    ContentDispatcher::new(chain)
}

fn chat_response(content: &str) -> String {
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
    .to_string()
}

#[test]
fn bio_flow_embeds_brief_in_template_and_trims_result() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("artist bio for the given prompt".to_string()),
            Matcher::Regex("mosaic artist from Lisbon".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_response("\n• Turns broken tiles into city light 🎨\n"))
        .create();

    let generator = BioGenerator::new(dispatcher_backed_by(&server, "test-key"));
    let content = generator
        .generate(&BioBrief {
            prompt: "mosaic artist from Lisbon".to_string(),
        })
        .expect("bio generation should succeed");

    mock.assert();
    assert_eq!(content.text, "• Turns broken tiles into city light 🎨");
    assert_eq!(content.provider, "OpenAI");
}

#[test]
fn social_flow_sends_details_block_and_parses_markers() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("- Product: Riso zine bundle".to_string()),
            Matcher::Regex("- Keywords: N/A".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_response(
            "Caption: Four zines, two inks, one very loud pink.\nTagline: Print it like you mean it.",
        ))
        .create();

    let generator = SocialPostGenerator::new(dispatcher_backed_by(&server, "test-key"))
        .expect("generator should build");
    let post = generator
        .generate(&SocialPostBrief {
            product: "Riso zine bundle".to_string(),
            audience: "zine fair regulars".to_string(),
            tone: "playful".to_string(),
            platform: "Instagram".to_string(),
            keywords: None,
        })
        .expect("social generation should succeed");

    mock.assert();
    assert_eq!(post.caption, "Four zines, two inks, one very loud pink.");
    assert_eq!(post.tagline, "Print it like you mean it.");
}

#[test]
fn social_flow_surfaces_exhaustion_with_provider_entry() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
        .create();

    let generator = SocialPostGenerator::new(dispatcher_backed_by(&server, "test-key"))
        .expect("generator should build");
    let error = generator
        .generate(&SocialPostBrief {
            product: "Riso zine bundle".to_string(),
            audience: "zine fair regulars".to_string(),
            tone: "playful".to_string(),
            platform: "Instagram".to_string(),
            keywords: Some("risograph".to_string()),
        })
        .expect_err("sole provider failing should exhaust");

    mock.assert();
    let ContentError::Exhausted { attempts } = error else {
        panic!("expected exhaustion, got {error:?}");
    };
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].provider, "OpenAI");
    assert!(attempts[0].message.contains("429"));
}
