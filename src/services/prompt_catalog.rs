use crate::services::localization::Locale;

const ENGLISH_PROMPTS: &[&str] = &[
    "Analyze facial expressions and suggest mood states",
    "Signs of depression or anxiety?",
    "Suggest mental health resources",
    "Analyze environment for risk factors",
    "I'm feeling stressed, what can I do?",
    "How to improve mental wellbeing?",
];

const HINDI_PROMPTS: &[&str] = &[
    "चेहरे के भावों का विश्लेषण कर मनोदशा बताएं",
    "अवसाद या चिंता के लक्षण?",
    "मानसिक स्वास्थ्य संसाधन सुझाएं",
    "जोखिम कारकों के लिए वातावरण विश्लेषण",
    "मैं तनाव महसूस कर रहा हूँ, क्या करूँ?",
    "मानसिक स्वास्थ्य कैसे सुधारें?",
];

/// Example prompts for a language code; unknown codes get English.
pub fn prompts_for(lang: &str) -> &'static [&'static str] {
    match Locale::from_code(lang) {
        Locale::English => ENGLISH_PROMPTS,
        Locale::Hindi => HINDI_PROMPTS,
    }
}
