use crate::llm::provider::{LlmProvider, ProviderConfig};
use crate::llm::types::{LlmError, LlmMessage, LlmRequest, LlmResponse, LlmUsage};
use crate::settings::Settings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub struct GroqProvider {
    client: Client,
    api_key: String,
    config: ProviderConfig,
}

#[derive(Debug, Serialize)]
struct GroqRequest<'a> {
    messages: &'a [LlmMessage],
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    model: Option<String>,
    choices: Vec<GroqChoice>,
    usage: Option<GroqUsage>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

impl GroqProvider {
    pub fn new(settings: &Settings) -> Result<Self, LlmError> {
        if settings.groq_api_key.is_empty() {
            return Err(LlmError::AuthenticationFailed);
        }

        let config = ProviderConfig::new("groq", settings.groq_api_base.trim_end_matches('/'))
            .with_default_model(&settings.model)
            .with_images_support(true)
            .with_timeout(settings.llm_timeout);

        let client = Client::builder().timeout(config.timeout).build()?;

        info!(
            event = "groq_provider_initialized",
            api_base_url = %config.api_base_url,
            model = %config.default_model,
            max_tokens = config.max_tokens_default,
            temperature = config.temperature_default,
            timeout_secs = config.timeout.as_secs(),
            "Groq provider initialized"
        );

        Ok(Self {
            client,
            api_key: settings.groq_api_key.clone(),
            config,
        })
    }

    fn convert_response(&self, groq_response: GroqResponse) -> Result<LlmResponse, LlmError> {
        let choice = groq_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ProviderError("No choices in response".to_string()))?;

        let content = choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::ProviderError("Empty content in response".to_string()))?;

        let usage = groq_response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        info!(
            event = "groq_response_received",
            model = ?groq_response.model,
            finish_reason = ?choice.finish_reason,
            content_length = content.len(),
            total_tokens = ?usage.as_ref().and_then(|u| u.total_tokens),
            "Groq response converted"
        );

        Ok(LlmResponse {
            content: Some(content),
            finish_reason: choice.finish_reason,
            usage,
            model: groq_response.model,
        })
    }
}

fn transport_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::HttpError(err)
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn supports_images(&self) -> bool {
        self.config.supports_images
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let groq_request = GroqRequest {
            messages: &request.messages,
            model: &request.model,
            temperature: request.temperature.or(Some(self.config.temperature_default)),
            max_completion_tokens: request.max_tokens.or(Some(self.config.max_tokens_default)),
            stream: false,
        };

        info!(
            event = "groq_api_request",
            model = %request.model,
            message_count = request.messages.len(),
            has_image = request.messages.iter().any(|m| m.has_image()),
            prompt_length = request.messages.iter().map(|m| m.text().len()).sum::<usize>(),
            timeout_secs = self.config.timeout.as_secs(),
            "Sending request to Groq API"
        );

        let url = format!("{}/chat/completions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&groq_request)
            .send()
            .await
            .map_err(|e| {
                error!(event = "groq_transport_error", error = %e, timed_out = e.is_timeout(), "Groq API unreachable");
                transport_error(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            error!(
                event = "groq_api_error",
                status_code = %status,
                error_text = %body,
                "Groq API request failed"
            );

            return Err(match status.as_u16() {
                401 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimitExceeded,
                400 => LlmError::InvalidRequest(body),
                _ => LlmError::ApiError {
                    status: status.as_u16(),
                    message: body,
                },
            });
        }

        let groq_response: GroqResponse = serde_json::from_str(&body)?;
        self.convert_response(groq_response)
    }
}
