pub mod json;
pub mod md;

use crate::build_label::BuildLabel;
use crate::error::{DashboardError, Result};
use crate::types::summary::Summary;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(
    summary: &Summary,
    build: Option<&BuildLabel>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(summary).map_err(DashboardError::Json),
        OutputFormat::Md => Ok(md::to_markdown(summary, build)),
    }
}
