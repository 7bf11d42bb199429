use crate::llm::types::{LlmError, LlmRequest, LlmResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Output cap for every analysis request.
pub const MAX_OUTPUT_TOKENS: u32 = 1500;
/// Sampling temperature for every analysis request.
pub const TEMPERATURE: f32 = 0.7;

/// Generic trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Whether the configured model accepts image content. Image requests are refused otherwise.
    fn supports_images(&self) -> bool;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;

    /// Send a single completion request. Implementations must not retry.
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub api_base_url: String,
    pub default_model: String,
    pub supports_images: bool,

    pub max_tokens_default: u32,
    pub temperature_default: f32,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_base_url: api_base_url.into(),
            default_model: "default".to_string(),
            supports_images: false,

            max_tokens_default: MAX_OUTPUT_TOKENS,
            temperature_default: TEMPERATURE,
            timeout: Duration::from_secs(45),
        }
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_images_support(mut self, supports: bool) -> Self {
        self.supports_images = supports;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
