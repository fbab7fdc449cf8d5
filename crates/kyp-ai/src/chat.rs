//! HTTP client for OpenAI-compatible chat-completion backends (Groq by default).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::AiError;
use crate::generator::{GenerateRequest, GenerateResponse, TextGenerator};

/// Chat-completion client implementing [`TextGenerator`].
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

impl ChatClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.groq.com/openai/v1";
    pub const DEFAULT_MODEL: &'static str = "llama-3.3-70b-versatile";

    /// Create a client for `base_url` (like `https://api.groq.com/openai/v1`, no
    /// trailing slash needed). Without an API key no `Authorization` header is sent.
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn body<'a>(&'a self, request: &'a GenerateRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user_prompt,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

fn into_generated(resp: ChatResponse) -> Result<GenerateResponse, AiError> {
    let tokens_used = resp.usage.map(|u| u.total_tokens).unwrap_or(0);
    let text = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|t| !t.trim().is_empty())
        .ok_or(AiError::EmptyResponse)?;
    Ok(GenerateResponse { text, tokens_used })
}

#[async_trait]
impl TextGenerator for ChatClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, AiError> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(url = %url, model = %self.model, "sending chat completion");
        let mut req = self.client.post(&url).json(&self.body(request));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "chat completion rejected");
            return Err(AiError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&resp.text().await?)?;
        into_generated(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerateRequest {
        GenerateRequest {
            system_prompt: Some("be terse".into()),
            user_prompt: "Company: Acme".into(),
            max_tokens: 64,
            temperature: 0.0,
        }
    }

    #[test]
    fn trims_trailing_slash() {
        let client = ChatClient::new("http://localhost:4000/".into(), None, "m".into());
        assert_eq!(client.base_url, "http://localhost:4000");
    }

    #[test]
    fn request_body_shape() {
        let client = ChatClient::new("http://x".into(), None, "llama".into());
        let req = request();
        let json = serde_json::to_value(client.body(&req)).unwrap();

        assert_eq!(json["model"], "llama");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be terse");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Company: Acme");
        assert_eq!(json["max_tokens"], 64);
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn request_without_system_prompt() {
        let client = ChatClient::new("http://x".into(), None, "llama".into());
        let req = GenerateRequest {
            system_prompt: None,
            ..request()
        };
        let json = serde_json::to_value(client.body(&req)).unwrap();
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn response_first_choice_wins() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{
                "id": "chatcmpl-1",
                "choices": [
                    { "index": 0, "message": { "role": "assistant", "content": "{\"decision\":\"DENY\"}" }, "finish_reason": "stop" },
                    { "index": 1, "message": { "role": "assistant", "content": "other" }, "finish_reason": "stop" }
                ],
                "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
            }"#,
        )
        .unwrap();
        let generated = into_generated(resp).unwrap();
        assert_eq!(generated.text, r#"{"decision":"DENY"}"#);
        assert_eq!(generated.tokens_used, 15);
    }

    #[test]
    fn response_without_choices_is_empty() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(into_generated(resp), Err(AiError::EmptyResponse)));

        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(into_generated(resp), Err(AiError::EmptyResponse)));
    }

    #[tokio::test]
    async fn generate_against_mock_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(serde_json::json!({ "model": "llama" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "hello" } }],
                "usage": { "total_tokens": 7 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri(), Some("secret".into()), "llama".into());
        let resp = client.generate(&request()).await.unwrap();
        assert_eq!(resp.text, "hello");
        assert_eq!(resp.tokens_used, 7);
    }

    #[tokio::test]
    async fn generate_maps_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri(), None, "llama".into());
        let err = client.generate(&request()).await.unwrap_err();
        match err {
            AiError::Server { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
