use crate::services::localization::Locale;
use tracing::info;

/// Substrings that flag a reply as risk-related. Matched case-insensitively.
pub const TRIGGER_TERMS: [&str; 4] = ["crisis", "suicid", "self-harm", "emergency"];

pub struct CrisisAnnotator {
    hotline: String,
}

impl CrisisAnnotator {
    pub fn new(hotline: impl Into<String>) -> Self {
        Self {
            hotline: hotline.into(),
        }
    }

    pub fn detect(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        let matched: Vec<&str> = TRIGGER_TERMS
            .iter()
            .copied()
            .filter(|term| lowered.contains(term))
            .collect();

        if !matched.is_empty() {
            info!(event = "crisis_terms_detected", terms = ?matched, "Reply contains crisis trigger terms");
        }

        !matched.is_empty()
    }

    pub fn notice(&self, locale: Locale) -> String {
        match locale {
            Locale::English => format!("🚨 In crisis, call {} or emergency services", self.hotline),
            Locale::Hindi => format!(
                "🚨 आपात स्थिति में कृपया {} या आपातकालीन सेवाओं को कॉल करें",
                self.hotline
            ),
        }
    }

    pub fn append_notice(&self, text: String, locale: Locale) -> String {
        format!("{}\n\n{}", text, self.notice(locale))
    }
}
