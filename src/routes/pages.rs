use crate::error::FailureKind;
use crate::routes::analysis::ApiError;
use crate::services::localization::{ENGLISH, Locale};
use crate::services::prompt_catalog::prompts_for;
use axum::{
    Json,
    extract::Query,
    response::Html,
};
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use tracing::error;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

#[derive(Debug, Deserialize)]
pub struct LangParams {
    lang: Option<String>,
}

impl LangParams {
    fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(ENGLISH)
    }
}

#[derive(Debug, Serialize)]
pub struct PromptList {
    pub prompts: Vec<&'static str>,
}

pub async fn prompts(Query(params): Query<LangParams>) -> Json<PromptList> {
    Json(PromptList {
        prompts: prompts_for(params.lang()).to_vec(),
    })
}

pub async fn index(Query(params): Query<LangParams>) -> Result<Html<String>, ApiError> {
    render_index(params.lang()).map(Html).map_err(|e| {
        error!(event = "index_render_failed", error = %e, "Failed to render landing page");
        ApiError::from(FailureKind::Unexpected)
    })
}

fn render_index(lang: &str) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("index.html", INDEX_TEMPLATE)?;
    env.get_template("index.html")?.render(context! {
        lang => Locale::from_code(lang).code(),
        prompts => prompts_for(lang),
    })
}
