use crate::error::AnalysisError;
use crate::services::{AnalysisRequest, AnalysisResponse, AnalysisService, ResourceBundle, ResponseAssembler};
use crate::settings::Settings;
use anyhow::Result;
use std::path::Path;

pub async fn run(settings: Settings, image: Option<&Path>, query: String, json: bool) -> Result<()> {
    let service = AnalysisService::from_settings(&settings)?;
    let assembler = ResponseAssembler::new(ResourceBundle::from_settings(&settings));

    let response = analyze_once(&service, &assembler, image, query).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&ScriptReport::from(&response))?);
    } else {
        print!("{}", render_report(&response));
    }
    Ok(())
}

/// One pipeline run for a local file. Read failures surface as the generic error.
pub async fn analyze_once(
    service: &AnalysisService,
    assembler: &ResponseAssembler,
    image: Option<&Path>,
    query: String,
) -> AnalysisResponse {
    let mut request = AnalysisRequest::text(query);
    if let Some(path) = image {
        match tokio::fs::read(path).await {
            Ok(bytes) => request = request.with_image(bytes),
            Err(e) => {
                return assembler.assemble(Err(AnalysisError::unexpected(format!(
                    "failed to read {}: {e}",
                    path.display()
                ))));
            }
        }
    }
    assembler.assemble(service.analyze(request).await)
}

/// The standalone record: `{ analysis, error, resources }`.
#[derive(serde::Serialize)]
pub struct ScriptReport<'a> {
    pub analysis: Option<&'a str>,
    pub error: Option<&'a str>,
    pub resources: &'a ResourceBundle,
}

impl<'a> From<&'a AnalysisResponse> for ScriptReport<'a> {
    fn from(response: &'a AnalysisResponse) -> Self {
        Self {
            analysis: response.analysis.as_deref(),
            error: response.error.as_deref(),
            resources: &response.resources,
        }
    }
}

fn render_report(response: &AnalysisResponse) -> String {
    let mut out = String::new();

    match &response.analysis {
        Some(analysis) => {
            out.push_str("=== Mental Health Analysis ===\n");
            out.push_str(analysis);
            out.push('\n');
        }
        None => {
            out.push_str("Analysis could not be completed.\n");
            out.push_str(&format!(
                "Error: {}\n",
                response.error.as_deref().unwrap_or("Unknown error")
            ));
        }
    }

    out.push_str("\n=== Resources ===\n");
    out.push_str(&format!("Crisis Hotline: {}\n", response.resources.hotline));
    out.push_str(&format!("Text Line: {}\n", response.resources.text_line));
    out.push_str(&format!("International: {}\n", response.resources.international));
    out
}
