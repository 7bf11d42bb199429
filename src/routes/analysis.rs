use crate::error::FailureKind;
use crate::routes::AppState;
use crate::services::{AnalysisRequest, AnalysisResponse};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: &'static str,
}

impl ApiError {
    fn missing_query() -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: "Field required: query",
        }
    }

    fn malformed_form() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: "Malformed multipart body",
        }
    }

    fn upload_too_large() -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            detail: "Upload exceeds the 10 MiB limit",
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        warn!(event = "multipart_read_failed", status = %err.status(), error = %err, "Could not read upload form");
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::upload_too_large()
        } else {
            Self::malformed_form()
        }
    }
}

impl From<FailureKind> for ApiError {
    fn from(kind: FailureKind) -> Self {
        let status = match kind {
            FailureKind::InvalidImage => StatusCode::BAD_REQUEST,
            FailureKind::Gateway | FailureKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: kind.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CrisisResources {
    pub hotline: String,
    pub text: String,
    pub international: String,
}

#[derive(Debug, Serialize)]
pub struct UploadReply {
    pub analysis: String,
    pub crisis_resources: CrisisResources,
    pub input_lang: String,
    pub has_image: bool,
}

impl From<AnalysisResponse> for UploadReply {
    fn from(response: AnalysisResponse) -> Self {
        Self {
            analysis: response.analysis.unwrap_or_default(),
            crisis_resources: CrisisResources {
                hotline: response.resources.hotline,
                text: response.resources.text_line,
                international: response.resources.international,
            },
            input_lang: response.input_lang.unwrap_or_default(),
            has_image: response.has_image,
        }
    }
}

#[derive(Default)]
struct UploadForm {
    query: Option<String>,
    image: Option<Vec<u8>>,
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("query") => {
                form.query = Some(field.text().await?);
            }
            Some("image") => {
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was picked.
                if !bytes.is_empty() {
                    form.image = Some(bytes.to_vec());
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

pub async fn upload_and_query(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadReply>, ApiError> {
    let form = read_form(&mut multipart).await?;
    let query = form
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(ApiError::missing_query)?;

    let request = AnalysisRequest {
        query,
        image: form.image,
    };
    let response = state.assembler.assemble(state.service.analyze(request).await);

    match response.failure {
        Some(kind) => Err(kind.into()),
        None => Ok(Json(response.into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::llm::types::LlmError;
    use crate::routes::{AppState, MAX_UPLOAD_BYTES, build_router};
    use crate::services::analysis_service::tests::{ScriptedProvider, service};
    use crate::services::localization::tests::RecordingTranslator;
    use crate::services::{ResourceBundle, ResponseAssembler};
    use crate::utils::image_processor::tests::encoded;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use http_body_util::BodyExt;
    use image::ImageFormat;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "manas-test-boundary";

    fn app(gateway: Arc<ScriptedProvider>) -> axum::Router {
        build_router(AppState {
            service: Arc::new(service(gateway, Some("en"), Arc::new(RecordingTranslator::failing()))),
            assembler: Arc::new(ResponseAssembler::new(ResourceBundle {
                hotline: "988".to_string(),
                text_line: "Text HOME to 741741".to_string(),
                international: "https://www.befrienders.org".to_string(),
            })),
        })
    }

    fn multipart(query: Option<&str>, image: Option<&[u8]>) -> Request<Body> {
        let mut body = Vec::new();
        if let Some(query) = query {
            body.extend_from_slice(
                format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"query\"\r\n\r\n{query}\r\n").as_bytes(),
            );
        }
        if let Some(image) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"face.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(image);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload_and_query")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_text_only_success() {
        let gateway = Arc::new(ScriptedProvider::replying(
            "Try breathing exercises. If in crisis, call emergency services.",
        ));
        let resp = app(gateway)
            .oneshot(multipart(Some("I'm feeling stressed, what can I do?"), None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert!(
            body["analysis"]
                .as_str()
                .unwrap()
                .ends_with("🚨 In crisis, call 988 or emergency services")
        );
        assert_eq!(body["crisis_resources"]["hotline"], "988");
        assert_eq!(body["crisis_resources"]["text"], "Text HOME to 741741");
        assert_eq!(body["input_lang"], "en");
        assert_eq!(body["has_image"], false);
    }

    #[tokio::test]
    async fn test_image_upload_success() {
        let gateway = Arc::new(ScriptedProvider::replying("The expression could indicate tiredness."));
        let resp = app(gateway.clone())
            .oneshot(multipart(Some("Analyze facial expressions"), Some(encoded(ImageFormat::Jpeg).as_slice())))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["has_image"], true);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_image_is_400() {
        let gateway = Arc::new(ScriptedProvider::replying("unused"));
        let resp = app(gateway.clone())
            .oneshot(multipart(Some("Analyze facial expressions"), Some(&b"\xFF\xD8\xFF\xE0 broken"[..])))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["detail"], "Invalid image format");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_500() {
        let gateway = Arc::new(ScriptedProvider::failing(|| LlmError::Timeout));
        let resp = app(gateway)
            .oneshot(multipart(Some("How to improve mental wellbeing?"), None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(resp).await;
        assert_eq!(body["detail"], "AI service unavailable");
        assert!(body.get("analysis").is_none());
    }

    #[tokio::test]
    async fn test_missing_query_is_rejected() {
        let gateway = Arc::new(ScriptedProvider::replying("unused"));
        let resp = app(gateway.clone()).oneshot(multipart(None, None)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_413() {
        let gateway = Arc::new(ScriptedProvider::replying("unused"));
        let mut image = encoded(ImageFormat::Png);
        image.resize(MAX_UPLOAD_BYTES + 1024, 0);

        let resp = app(gateway.clone())
            .oneshot(multipart(Some("Analyze facial expressions"), Some(image.as_slice())))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(resp).await["detail"], "Upload exceeds the 10 MiB limit");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_broken_multipart_is_400() {
        let gateway = Arc::new(ScriptedProvider::replying("unused"));
        let request = Request::builder()
            .method("POST")
            .uri("/upload_and_query")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"query\"\r\n\r\nunterminated"
            )))
            .unwrap();

        let resp = app(gateway.clone()).oneshot(request).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["detail"], "Malformed multipart body");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_image_part_counts_as_no_image() {
        let gateway = Arc::new(ScriptedProvider::replying("Rest may help."));
        let resp = app(gateway)
            .oneshot(multipart(Some("How to improve mental wellbeing?"), Some(&b""[..])))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["has_image"], false);
    }
}
