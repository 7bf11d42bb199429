use crate::llm::types::LlmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Model gateway error: {0}")]
    Gateway(#[from] LlmError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse failure class handed to adapters; carries no upstream detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidImage,
    Gateway,
    Unexpected,
}

impl FailureKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::InvalidImage => "Invalid image format",
            FailureKind::Gateway => "AI service unavailable",
            FailureKind::Unexpected => "Internal server error",
        }
    }
}

impl AnalysisError {
    pub fn invalid_image<S: Into<String>>(msg: S) -> Self {
        Self::InvalidImage(msg.into())
    }

    pub fn unexpected<S: Into<String>>(msg: S) -> Self {
        Self::Unexpected(msg.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            AnalysisError::InvalidImage(_) => FailureKind::InvalidImage,
            AnalysisError::Gateway(_) => FailureKind::Gateway,
            AnalysisError::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Environment variable '{0}' not set")]
    EnvVar(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SettingsError {
    pub fn env_var(var: &str) -> Self {
        Self::EnvVar(var.to_string())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
