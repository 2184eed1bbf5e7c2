use crate::error::PipelineError;
use pagefit_idf::GraphicPolicy;
use pagefit_layout::FitPolicy;
use pagefit_style::PageOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Page setup supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    /// Page-format token looked up in the format table (e.g. `A4`, `Letter`).
    pub format: String,
    #[serde(flatten)]
    pub options: PageOptions,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            format: "A4".to_string(),
            options: PageOptions::default(),
        }
    }
}

/// Complete configuration of a fitting run.
///
/// ```json
/// {
///   "page": { "format": "Letter", "headerHeight": 40, "defaultMargins": "1in" },
///   "policy": { "severeFloor": 0.12, "strategy": "transform" },
///   "graphics": { "markers": [".svg", "chart"] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FitConfig {
    pub page: PageConfig,
    pub policy: FitPolicy,
    pub graphics: GraphicPolicy,
}

impl FitConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PipelineError> {
        let config: FitConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            PipelineError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config from '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_json_str(&source)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        self.policy
            .validate()
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        let page = &self.page.options;
        if !(page.header_height.is_finite() && page.header_height >= 0.0)
            || !(page.footer_height.is_finite() && page.footer_height >= 0.0)
        {
            return Err(PipelineError::Config(format!(
                "header and footer heights must be non-negative, got {} and {}",
                page.header_height, page.footer_height
            )));
        }
        if self.page.format.trim().is_empty() {
            return Err(PipelineError::Config("page format must not be empty".to_string()));
        }
        Ok(())
    }
}
