use crate::error::AnalysisError;
use crate::llm::ImageData;
use image::ImageFormat;
use tracing::{error, info};

/// Upload bytes that decoded cleanly, with the format they decoded as.
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl ValidatedImage {
    pub fn mime_type(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
            _ => "application/octet-stream",
        }
    }

    pub fn encode(&self) -> ImageData {
        ImageData {
            base64_data: base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &self.bytes),
            mime_type: self.mime_type().to_string(),
        }
    }
}

pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Sniffs the format and fully decodes the image. Bytes come back untouched.
    pub fn validate(&self, bytes: Vec<u8>) -> Result<ValidatedImage, AnalysisError> {
        if bytes.is_empty() {
            return Err(AnalysisError::invalid_image("empty upload"));
        }

        let format = image::guess_format(&bytes).map_err(|e| {
            error!(event = "image_format_unknown", size_bytes = bytes.len(), error = %e, "Invalid image format");
            AnalysisError::invalid_image(e.to_string())
        })?;

        let decoded = image::load_from_memory_with_format(&bytes, format).map_err(|e| {
            error!(
                event = "image_decode_failed",
                format = ?format,
                size_bytes = bytes.len(),
                error = %e,
                "Invalid image format"
            );
            AnalysisError::invalid_image(e.to_string())
        })?;

        info!(
            event = "image_validated",
            format = ?format,
            width = decoded.width(),
            height = decoded.height(),
            size_bytes = bytes.len(),
            "Image passed verification"
        );

        Ok(ValidatedImage { bytes, format })
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}
