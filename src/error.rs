// src/error.rs
use pagefit_layout::LayoutError;
use pagefit_style::StyleParseError;
use thiserror::Error;

/// Errors surfaced by the pipeline. Fitting itself never fails; only loading
/// inputs and configuration can.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Layout setup failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Stylesheet value is invalid: {0}")]
    Style(#[from] StyleParseError),
}
