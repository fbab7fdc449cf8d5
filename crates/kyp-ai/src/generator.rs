//! The seam between risk classification and whatever produces the text.

use async_trait::async_trait;

use crate::AiError;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    pub text: String,
    pub tokens_used: u32,
}

/// A request/response text-generation capability.
///
/// Implementations must be safe to call concurrently; the pipeline keeps
/// several requests in flight against one instance.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, AiError>;
}
