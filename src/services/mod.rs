pub mod analysis_service;
pub mod crisis;
pub mod localization;
pub mod prompt_builder;
pub mod prompt_catalog;
pub mod response;

pub use analysis_service::{AnalysisRequest, AnalysisService};
pub use response::{AnalysisResponse, ResourceBundle, ResponseAssembler};
