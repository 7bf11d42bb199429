use crate::error::SettingsError;
use std::env;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";
pub const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TRANSLATE_API_BASE: &str = "https://translate.googleapis.com";
pub const DEFAULT_CRISIS_HOTLINE: &str = "988";
pub const DEFAULT_TEXT_LINE: &str = "Text HOME to 741741";
pub const DEFAULT_INTERNATIONAL_URL: &str = "https://www.befrienders.org";

/// Process-wide configuration, read once at startup and never mutated.
#[derive(Clone, Debug)]
pub struct Settings {
    pub groq_api_key: String,
    pub groq_api_base: String,
    pub model: String,
    pub llm_timeout: Duration,
    pub translate_api_base: String,
    pub translate_timeout: Duration,
    pub crisis_hotline: String,
    pub crisis_text_line: String,
    pub crisis_international: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let groq_api_key = get("GROQ_API_KEY").ok_or_else(|| SettingsError::env_var("GROQ_API_KEY"))?;

        let settings = Self {
            groq_api_key,
            groq_api_base: get("GROQ_API_BASE").unwrap_or_else(|| DEFAULT_GROQ_API_BASE.to_string()),
            model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout: parse_secs(get("LLM_TIMEOUT_SECS"), "LLM_TIMEOUT_SECS", 45)?,
            translate_api_base: get("TRANSLATE_API_BASE")
                .unwrap_or_else(|| DEFAULT_TRANSLATE_API_BASE.to_string()),
            translate_timeout: parse_secs(get("TRANSLATE_TIMEOUT_SECS"), "TRANSLATE_TIMEOUT_SECS", 15)?,
            crisis_hotline: get("CRISIS_HOTLINE").unwrap_or_else(|| DEFAULT_CRISIS_HOTLINE.to_string()),
            crisis_text_line: get("CRISIS_TEXT_LINE").unwrap_or_else(|| DEFAULT_TEXT_LINE.to_string()),
            crisis_international: get("CRISIS_INTERNATIONAL_URL")
                .unwrap_or_else(|| DEFAULT_INTERNATIONAL_URL.to_string()),
        };

        info!(
            event = "settings_loaded",
            model = %settings.model,
            groq_api_base = %settings.groq_api_base,
            llm_timeout_secs = settings.llm_timeout.as_secs(),
            crisis_hotline = %settings.crisis_hotline,
            "Settings loaded"
        );

        Ok(settings)
    }
}

fn parse_secs(raw: Option<String>, key: &str, default: u64) -> Result<Duration, SettingsError> {
    match raw {
        None => Ok(Duration::from_secs(default)),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(0) => Err(SettingsError::config(format!("{key} must be greater than zero"))),
            Ok(secs) => Ok(Duration::from_secs(secs)),
            Err(_) => Err(SettingsError::config(format!("{key} must be a whole number of seconds, got '{value}'"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Settings::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, SettingsError::EnvVar(ref k) if k == "GROQ_API_KEY"));

        let err = Settings::from_lookup(lookup_from(&[("GROQ_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, SettingsError::EnvVar(_)));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        assert_eq!(settings.crisis_hotline, "988");
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.llm_timeout, Duration::from_secs(45));
        assert_eq!(settings.crisis_text_line, DEFAULT_TEXT_LINE);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("CRISIS_HOTLINE", "14416"),
            ("LLM_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(settings.crisis_hotline, "14416");
        assert_eq!(settings.llm_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let err = Settings::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("LLM_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));

        let err = Settings::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("LLM_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));
    }
}
