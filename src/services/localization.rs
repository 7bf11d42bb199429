use crate::settings::Settings;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use whatlang::{Lang, Script};

pub const ENGLISH: &str = "en";
pub const HINDI: &str = "hi";

/// Locales the service writes replies and notices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    English,
    Hindi,
}

impl Locale {
    pub fn from_code(code: &str) -> Self {
        match code {
            HINDI => Locale::Hindi,
            _ => Locale::English,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::English => ENGLISH,
            Locale::Hindi => HINDI,
        }
    }
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation service returned status {0}")]
    Status(u16),

    #[error("malformed translation response: {0}")]
    Malformed(String),
}

pub trait LanguageDetector: Send + Sync {
    /// ISO 639-1 code where one is known, `None` when detection fails.
    fn detect(&self, text: &str) -> Option<String>;
}

/// Script-first detection. Short Latin queries rarely clear the reliability bar and count as
/// undetected; any Devanagari text is read as Hindi, since Hindi, Marathi and Nepali
/// cannot be told apart at query length.
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;

        if info.script() == Script::Devanagari {
            return Some(HINDI.to_string());
        }

        if !info.is_reliable() {
            debug!(
                event = "language_detection_unreliable",
                lang = info.lang().code(),
                confidence = info.confidence(),
                "Discarding low-confidence language guess"
            );
            return None;
        }

        Some(iso_639_1(info.lang()).to_string())
    }
}

fn iso_639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Afr => "af",
        Lang::Aka => "ak",
        Lang::Amh => "am",
        Lang::Ara => "ar",
        Lang::Aze => "az",
        Lang::Bel => "be",
        Lang::Ben => "bn",
        Lang::Bul => "bg",
        Lang::Cat => "ca",
        Lang::Ces => "cs",
        Lang::Cmn => "zh",
        Lang::Dan => "da",
        Lang::Deu => "de",
        Lang::Ell => "el",
        Lang::Eng => "en",
        Lang::Epo => "eo",
        Lang::Est => "et",
        Lang::Fin => "fi",
        Lang::Fra => "fr",
        Lang::Guj => "gu",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Hrv => "hr",
        Lang::Hun => "hu",
        Lang::Hye => "hy",
        Lang::Ind => "id",
        Lang::Ita => "it",
        Lang::Jav => "jv",
        Lang::Jpn => "ja",
        Lang::Kan => "kn",
        Lang::Kat => "ka",
        Lang::Khm => "km",
        Lang::Kor => "ko",
        Lang::Lat => "la",
        Lang::Lav => "lv",
        Lang::Lit => "lt",
        Lang::Mal => "ml",
        Lang::Mar => "mr",
        Lang::Mkd => "mk",
        Lang::Mya => "my",
        Lang::Nep => "ne",
        Lang::Nld => "nl",
        Lang::Nob => "nb",
        Lang::Ori => "or",
        Lang::Pan => "pa",
        Lang::Pes => "fa",
        Lang::Pol => "pl",
        Lang::Por => "pt",
        Lang::Ron => "ro",
        Lang::Rus => "ru",
        Lang::Sin => "si",
        Lang::Slk => "sk",
        Lang::Slv => "sl",
        Lang::Sna => "sn",
        Lang::Spa => "es",
        Lang::Srp => "sr",
        Lang::Swe => "sv",
        Lang::Tam => "ta",
        Lang::Tel => "te",
        Lang::Tgl => "tl",
        Lang::Tha => "th",
        Lang::Tuk => "tk",
        Lang::Tur => "tr",
        Lang::Ukr => "uk",
        Lang::Urd => "ur",
        Lang::Uzb => "uz",
        Lang::Vie => "vi",
        Lang::Yid => "yi",
        Lang::Zul => "zu",
    }
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslationError>;
}

/// Client for the public `translate_a/single` endpoint with source auto-detection.
pub struct GoogleTranslator {
    client: Client,
    api_base_url: String,
}

impl GoogleTranslator {
    pub fn new(settings: &Settings) -> Result<Self, TranslationError> {
        let client = Client::builder().timeout(settings.translate_timeout).build()?;
        Ok(Self {
            client,
            api_base_url: settings.translate_api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslationError> {
        let url = format!("{}/translate_a/single", self.api_base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("client", "gtx"), ("sl", "auto"), ("tl", target), ("dt", "t"), ("q", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let segments = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| TranslationError::Malformed("missing segment list".to_string()))?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(|s| s.as_str()))
            .collect();

        if translated.is_empty() {
            return Err(TranslationError::Malformed("no translated text".to_string()));
        }

        Ok(translated)
    }
}

/// One curated override applied after machine translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlossaryRule {
    pub source: &'static str,
    pub target: &'static str,
}

/// English mental-health terms that machine translation tends to leave behind or mangle.
pub const HINDI_GLOSSARY: &[GlossaryRule] = &[
    GlossaryRule { source: "depression", target: "अवसाद" },
    GlossaryRule { source: "anxiety", target: "चिंता" },
    GlossaryRule { source: "stress", target: "तनाव" },
    GlossaryRule { source: "mental health", target: "मानसिक स्वास्थ्य" },
    GlossaryRule { source: "analysis", target: "विश्लेषण" },
    GlossaryRule { source: "suggestion", target: "सुझाव" },
    GlossaryRule { source: "crisis", target: "संकट" },
    GlossaryRule { source: "emergency", target: "आपातकाल" },
];

#[derive(Debug, Clone)]
pub struct Glossary {
    rules: &'static [GlossaryRule],
}

impl Glossary {
    pub fn new(rules: &'static [GlossaryRule]) -> Self {
        Self { rules }
    }

    pub fn hindi() -> Self {
        Self::new(HINDI_GLOSSARY)
    }

    /// Applies every rule in order; each is a plain, case-sensitive replacement.
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| acc.replace(rule.source, rule.target))
    }
}

pub struct LocalizationAdapter {
    detector: Arc<dyn LanguageDetector>,
    translator: Arc<dyn Translator>,
    hindi_glossary: Glossary,
}

impl LocalizationAdapter {
    pub fn new(detector: Arc<dyn LanguageDetector>, translator: Arc<dyn Translator>) -> Self {
        Self {
            detector,
            translator,
            hindi_glossary: Glossary::hindi(),
        }
    }

    pub fn detect_language(&self, text: &str) -> String {
        match self.detector.detect(text) {
            Some(lang) => lang,
            None => {
                warn!(event = "language_detection_failed", "Could not detect language, assuming English");
                ENGLISH.to_string()
            }
        }
    }

    /// Translates a non-English query to English. Falls back to the original text.
    pub async fn to_english(&self, text: &str, lang: &str) -> String {
        if lang == ENGLISH {
            return text.to_string();
        }

        match self.translator.translate(text, ENGLISH).await {
            Ok(translated) => {
                info!(event = "query_translated", source_lang = %lang, "Query translated to English");
                translated
            }
            Err(e) => {
                warn!(event = "translation_failed", direction = "to_english", source_lang = %lang, error = %e, "Translation failed, using original text");
                text.to_string()
            }
        }
    }

    /// Translates a reply back into the caller's locale. Only Hindi is translated.
    pub async fn localize_reply(&self, text: String, locale: Locale) -> String {
        match locale {
            Locale::English => text,
            Locale::Hindi => match self.translator.translate(&text, HINDI).await {
                Ok(translated) => self.hindi_glossary.apply(&translated),
                Err(e) => {
                    warn!(event = "translation_failed", direction = "to_hindi", error = %e, "Translation failed, using original text");
                    text
                }
            },
        }
    }
}
