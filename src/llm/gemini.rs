use reqwest::Client;
use serde::{ Deserialize, Serialize };
use async_trait::async_trait;
use log::info;

use super::{ ChatProvider, Content, ProviderError };

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

// Generation policy is fixed: the client never tunes sampling per request.
const TEMPERATURE: f32 = 0.9;
const TOP_K: u32 = 1;
const TOP_P: f32 = 1.0;
const MAX_OUTPUT_TOKENS: u32 = 2048;

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const BLOCK_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl GenerationConfig {
    fn fixed() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_k: TOP_K,
            top_p: TOP_P,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn safety_settings() -> Vec<SafetySetting> {
    HARM_CATEGORIES
        .iter()
        .map(|category| SafetySetting {
            category,
            threshold: BLOCK_THRESHOLD,
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Client for the Generative Language `generateContent` endpoint. Holds
/// only read-only configuration; one instance is shared by every request.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
    system_instruction: Option<String>,
}

impl GeminiClient {
    pub fn new(
        http: Client,
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        system_instruction: Option<String>
    ) -> Self {
        Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            system_instruction,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    async fn generate(
        &self,
        history: &[Content],
        message: &str
    ) -> Result<String, ProviderError> {
        let mut contents = history.to_vec();
        contents.push(Content::user(message));

        let payload = GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.as_deref().map(Content::untagged),
            generation_config: GenerationConfig::fixed(),
            safety_settings: safety_settings(),
        };

        info!(
            "GeminiClient::generate() → model={} turns={}",
            self.model,
            payload.contents.len()
        );

        let response = self.http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateContentResponse = response.json().await?;

        let blocked_reason = body.prompt_feedback.and_then(|f| f.block_reason);
        let content = body.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content);

        match content {
            Some(content) => Ok(content.text()),
            None => Err(ProviderError::Blocked { reason: blocked_reason }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        matchers::{ body_partial_json, method, path, query_param },
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server_uri: &str) -> GeminiClient {
        GeminiClient::new(
            Client::new(),
            "test-api-key".to_string(),
            None,
            Some(server_uri.to_string()),
            None,
        )
    }

    #[tokio::test]
    async fn generate_extracts_top_candidate_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-api-key"))
            .and(body_partial_json(json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "hello" }] }
                ],
                "generationConfig": {
                    "temperature": 0.9,
                    "topK": 1,
                    "topP": 1.0,
                    "maxOutputTokens": 2048
                },
                "safetySettings": [
                    { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "hi there" }]
                    }
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let reply = client.generate(&[], "hello").await.unwrap();
        assert_eq!(reply, "hi there");
    }

    #[tokio::test]
    async fn generate_sends_history_before_new_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "first" }] },
                    { "role": "model", "parts": [{ "text": "second" }] },
                    { "role": "user", "parts": [{ "text": "third" }] }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let history = vec![
            Content::turn(crate::models::chat::Role::User, "first"),
            Content::turn(crate::models::chat::Role::Model, "second"),
        ];

        let client = client_for(&mock_server.uri());
        let reply = client.generate(&history, "third").await.unwrap();
        assert_eq!(reply, "ok");
    }

    #[tokio::test]
    async fn generate_includes_system_instruction_when_configured() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "systemInstruction": { "parts": [{ "text": "You are a helpful assistant." }] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GeminiClient::new(
            Client::new(),
            "test-api-key".to_string(),
            None,
            Some(mock_server.uri()),
            Some("You are a helpful assistant.".to_string()),
        );
        client.generate(&[], "hello").await.unwrap();
    }

    #[tokio::test]
    async fn zero_candidates_maps_to_blocked_with_reason() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [],
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let err = client.generate(&[], "hello").await.unwrap_err();
        match err {
            ProviderError::Blocked { reason } => assert_eq!(reason.as_deref(), Some("SAFETY")),
            other => panic!("expected Blocked, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn candidate_without_content_maps_to_blocked_without_reason() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{}]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let err = client.generate(&[], "hello").await.unwrap_err();
        match err {
            ProviderError::Blocked { reason } => assert!(reason.is_none()),
            other => panic!("expected Blocked, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_error_status_maps_to_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let err = client.generate(&[], "hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::Http(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn slow_provider_maps_to_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(500))
                    .set_body_json(json!({
                        "candidates": [{ "content": { "parts": [{ "text": "late" }] } }]
                    }))
            )
            .mount(&mock_server)
            .await;

        let http = Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let client = GeminiClient::new(
            http,
            "test-api-key".to_string(),
            None,
            Some(mock_server.uri()),
            None,
        );

        let err = client.generate(&[], "hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout), "got {:?}", err);
    }
}
