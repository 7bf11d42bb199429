use crate::error::AnalysisError;
use crate::llm::provider::{MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::llm::types::{LlmError, LlmRequest, LlmResponse};
use crate::llm::{GroqProvider, LlmProvider};
use crate::services::crisis::CrisisAnnotator;
use crate::services::localization::{GoogleTranslator, LocalizationAdapter, Locale, WhatlangDetector};
use crate::services::prompt_builder::PromptBuilder;
use crate::services::response::AnalysisOutcome;
use crate::settings::Settings;
use crate::utils::ImageProcessor;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub query: String,
    pub image: Option<Vec<u8>>,
}

impl AnalysisRequest {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }
}

/// The shared core both adapters feed. Immutable once built.
pub struct AnalysisService {
    gateway: Arc<dyn LlmProvider>,
    localization: LocalizationAdapter,
    images: ImageProcessor,
    prompts: PromptBuilder,
    annotator: CrisisAnnotator,
}

impl AnalysisService {
    pub fn new(
        gateway: Arc<dyn LlmProvider>,
        localization: LocalizationAdapter,
        crisis_hotline: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            localization,
            images: ImageProcessor::new(),
            prompts: PromptBuilder::new(),
            annotator: CrisisAnnotator::new(crisis_hotline),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let gateway = GroqProvider::new(settings).context("failed to build Groq client")?;
        let translator = GoogleTranslator::new(settings).context("failed to build translation client")?;

        info!(
            event = "analysis_service_initialized",
            provider = gateway.name(),
            model = gateway.default_model(),
            supports_images = gateway.supports_images(),
            "Analysis service initialized"
        );

        Ok(Self::new(
            Arc::new(gateway),
            LocalizationAdapter::new(Arc::new(WhatlangDetector), Arc::new(translator)),
            settings.crisis_hotline.clone(),
        ))
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        let input_lang = self.localization.detect_language(&request.query);
        let locale = Locale::from_code(&input_lang);
        let query = self.localization.to_english(&request.query, &input_lang).await;

        let image = request
            .image
            .map(|bytes| self.images.validate(bytes))
            .transpose()?;
        let has_image = image.is_some();

        if has_image && !self.gateway.supports_images() {
            return Err(AnalysisError::unexpected(format!(
                "provider {} does not accept images",
                self.gateway.name()
            )));
        }

        info!(
            event = "analysis_started",
            provider = self.gateway.name(),
            input_lang = %input_lang,
            has_image = has_image,
            query_length = request.query.len(),
            "Processing analysis request"
        );

        let message = self.prompts.compose(&query, image.as_ref()).into_message();
        let llm_request = LlmRequest::new(self.gateway.default_model())
            .with_message(message)
            .with_max_tokens(MAX_OUTPUT_TOKENS)
            .with_temperature(TEMPERATURE);

        let LlmResponse {
            content,
            finish_reason,
            usage,
            model,
        } = self.gateway.generate(llm_request).await?;
        let content = content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::ProviderError("Empty content in response".to_string()))?;

        // Detection runs on the model's own language, before any translation.
        let crisis_flagged = self.annotator.detect(&content);
        let localized = self.localization.localize_reply(content, locale).await;
        let analysis = if crisis_flagged {
            self.annotator.append_notice(localized, locale)
        } else {
            localized
        };

        info!(
            event = "analysis_completed",
            input_lang = %input_lang,
            crisis_flagged = crisis_flagged,
            analysis_length = analysis.len(),
            model = ?model,
            finish_reason = ?finish_reason,
            prompt_tokens = ?usage.as_ref().and_then(|u| u.prompt_tokens),
            completion_tokens = ?usage.as_ref().and_then(|u| u.completion_tokens),
            "Analysis completed"
        );

        Ok(AnalysisOutcome {
            analysis,
            input_lang,
            has_image,
            crisis_flagged,
        })
    }
}
