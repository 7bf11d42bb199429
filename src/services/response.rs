use crate::error::{AnalysisError, FailureKind};
use crate::settings::Settings;
use serde::Serialize;
use tracing::{error, info};

/// Published help resources attached to every reply.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceBundle {
    pub hotline: String,
    pub text_line: String,
    pub international: String,
}

impl ResourceBundle {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            hotline: settings.crisis_hotline.clone(),
            text_line: settings.crisis_text_line.clone(),
            international: settings.crisis_international.clone(),
        }
    }
}

/// What the pipeline produced for one successful request.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis: String,
    pub input_lang: String,
    pub has_image: bool,
    pub crisis_flagged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub analysis: Option<String>,
    pub error: Option<String>,
    pub resources: ResourceBundle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_lang: Option<String>,
    pub has_image: bool,
    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

pub struct ResponseAssembler {
    resources: ResourceBundle,
}

impl ResponseAssembler {
    pub fn new(resources: ResourceBundle) -> Self {
        Self { resources }
    }

    /// Folds a pipeline result into the terminal record. Error detail is logged, never returned.
    pub fn assemble(&self, result: Result<AnalysisOutcome, AnalysisError>) -> AnalysisResponse {
        match result {
            Ok(outcome) => {
                info!(
                    event = "analysis_response_assembled",
                    input_lang = %outcome.input_lang,
                    has_image = outcome.has_image,
                    crisis_flagged = outcome.crisis_flagged,
                    "Assembled analysis response"
                );
                AnalysisResponse {
                    analysis: Some(outcome.analysis),
                    error: None,
                    resources: self.resources.clone(),
                    input_lang: Some(outcome.input_lang),
                    has_image: outcome.has_image,
                    failure: None,
                }
            }
            Err(err) => {
                let kind = err.kind();
                error!(event = "analysis_failed", kind = ?kind, error = %err, "Analysis pipeline failed");
                AnalysisResponse {
                    analysis: None,
                    error: Some(kind.user_message().to_string()),
                    resources: self.resources.clone(),
                    input_lang: None,
                    has_image: false,
                    failure: Some(kind),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::LlmError;

    fn assembler() -> ResponseAssembler {
        ResponseAssembler::new(ResourceBundle {
            hotline: "988".to_string(),
            text_line: "Text HOME to 741741".to_string(),
            international: "https://www.befrienders.org".to_string(),
        })
    }

    #[test]
    fn test_success_carries_metadata() {
        let response = assembler().assemble(Ok(AnalysisOutcome {
            analysis: "Rest may help.".to_string(),
            input_lang: "en".to_string(),
            has_image: true,
            crisis_flagged: false,
        }));
        assert_eq!(response.analysis.as_deref(), Some("Rest may help."));
        assert!(response.error.is_none());
        assert!(response.has_image);
        assert_eq!(response.resources.hotline, "988");
    }

    #[test]
    fn test_failure_nulls_analysis_and_hides_detail() {
        let response = assembler().assemble(Err(AnalysisError::Gateway(LlmError::ApiError {
            status: 500,
            message: "secret internal trace".to_string(),
        })));
        assert!(response.analysis.is_none());
        assert_eq!(response.error.as_deref(), Some("AI service unavailable"));
        assert_eq!(response.failure, Some(FailureKind::Gateway));

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("secret internal trace"));
        assert!(json.contains("\"analysis\":null"));
        assert!(json.contains("\"text_line\""));
    }
}
