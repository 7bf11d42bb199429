use crate::llm::ImageData;
use crate::llm::types::LlmMessage;
use crate::utils::ValidatedImage;

/// The single user turn sent to the model for one analysis.
#[derive(Debug, Clone)]
pub struct ComposedMessage {
    pub instruction: String,
    pub image: Option<ImageData>,
}

impl ComposedMessage {
    pub fn into_message(self) -> LlmMessage {
        let message = LlmMessage::user(self.instruction);
        match &self.image {
            Some(image) => message.with_image(image),
            None => message,
        }
    }
}

pub struct PromptBuilder;

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, query: &str, image: Option<&ValidatedImage>) -> ComposedMessage {
        let mut instruction = String::new();

        self.add_framing(&mut instruction, image.is_some());
        self.add_query(&mut instruction, query);
        self.add_constraints(&mut instruction);

        ComposedMessage {
            instruction,
            image: image.map(ValidatedImage::encode),
        }
    }

    fn add_framing(&self, prompt: &mut String, has_image: bool) {
        if has_image {
            prompt.push_str("As a mental health professional analyzing this image, provide:\n");
        } else {
            prompt.push_str("As a mental health professional, provide:\n");
        }
        prompt.push_str("1. Professional analysis\n");
        prompt.push_str("2. Possible mental health considerations\n");
        prompt.push_str("3. Supportive suggestions\n");
        prompt.push_str("4. Crisis resources if needed\n");

        if has_image {
            prompt.push_str("\nWhen looking at the image, consider:\n");
            prompt.push_str("- Mood indicators (facial expressions/posture)\n");
            prompt.push_str("- Environmental context\n");
            prompt.push_str("- Potential stress/anxiety cues\n");
        }
    }

    fn add_query(&self, prompt: &mut String, query: &str) {
        prompt.push_str(&format!("\nQuery: {}\n", query));
    }

    fn add_constraints(&self, prompt: &mut String) {
        prompt.push_str("\nImportant: Never diagnose, only suggest possibilities. ");
        prompt.push_str("Do not make diagnostic claims. ");
        prompt.push_str("Use hedging phrases like \"may suggest\" or \"could indicate\".");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ImageProcessor;
    use crate::utils::image_processor::tests::encoded;
    use image::ImageFormat;

    #[test]
    fn test_default_builder_composes_like_new() {
        let query = "How to improve mental wellbeing?";
        assert_eq!(
            PromptBuilder::default().compose(query, None).instruction,
            PromptBuilder::new().compose(query, None).instruction
        );
    }

    #[test]
    fn test_text_only_has_no_image_reference() {
        let composed = PromptBuilder::new().compose("I'm feeling stressed, what can I do?", None);
        assert!(composed.image.is_none());
        assert!(!composed.instruction.contains("analyzing this image"));

        let message = composed.into_message();
        assert!(!message.has_image());
        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("image_url"));
        assert!(!json.contains("data:image"));
    }

    #[test]
    fn test_query_is_verbatim_and_hedged() {
        let query = "Signs of depression or anxiety?";
        let composed = PromptBuilder::new().compose(query, None);
        assert!(composed.instruction.contains(&format!("Query: {}", query)));
        assert!(composed.instruction.contains("Never diagnose"));
        assert!(composed.instruction.contains("may suggest"));
    }

    #[test]
    fn test_image_attached_as_data_uri() {
        let image = ImageProcessor::new().validate(encoded(ImageFormat::Png)).unwrap();
        let composed = PromptBuilder::new().compose("What mood might this person be experiencing?", Some(&image));
        assert!(composed.instruction.contains("analyzing this image"));

        let message = composed.into_message();
        assert!(message.has_image());
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_framing_is_latin_even_for_devanagari_query() {
        let query = "मैं तनाव महसूस कर रहा हूँ, क्या करूँ?";
        let composed = PromptBuilder::new().compose(query, None);
        let framing = composed.instruction.replace(query, "");
        assert!(framing.is_ascii());
        assert!(composed.instruction.contains(query));
    }
}
