// src/pipeline/builder.rs
use super::config::FitConfig;
use super::orchestrator::FitPipeline;
use crate::error::PipelineError;
use log::debug;
use pagefit_layout::FitEngine;
use pagefit_style::{GeometryResolver, PageFormatTable, parse_page_size};
use std::fs;
use std::io;
use std::path::Path;

/// A builder for creating a `FitPipeline`.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    stylesheet: String,
    config: FitConfig,
    formats: PageFormatTable,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            stylesheet: String::new(),
            config: FitConfig::default(),
            formats: PageFormatTable::standard(),
        }
    }
}

fn read_file(path: &Path, what: &str) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|e| {
        PipelineError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read {} from '{}': {}", what, path.display(), e),
        ))
    })
}

impl PipelineBuilder {
    /// Creates a new `PipelineBuilder` with default configuration and the
    /// standard page formats.
    pub fn new() -> Self {
        Default::default()
    }

    /// Uses `css` as the stylesheet the page geometry is read from.
    pub fn with_stylesheet(mut self, css: impl Into<String>) -> Self {
        self.stylesheet = css.into();
        self
    }

    pub fn with_stylesheet_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PipelineError> {
        self.stylesheet = read_file(path.as_ref(), "stylesheet")?;
        Ok(self)
    }

    pub fn with_config(mut self, config: FitConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PipelineError> {
        self.config = FitConfig::from_file(path)?;
        Ok(self)
    }

    /// Replaces the page-format table.
    pub fn with_format_table(mut self, formats: PageFormatTable) -> Self {
        self.formats = formats;
        self
    }

    /// Registers a custom format from a CSS `size` value such as `"170mm 240mm"`.
    pub fn with_custom_format(mut self, token: &str, size: &str) -> Result<Self, PipelineError> {
        let parsed = parse_page_size(size, &self.formats)?.ok_or_else(|| {
            PipelineError::Config(format!("'{}' does not define a page size", size))
        })?;
        self.formats.register(token, parsed);
        Ok(self)
    }

    /// Validates the configuration, resolves page geometry and builds the pipeline.
    pub fn build(self) -> Result<FitPipeline, PipelineError> {
        self.config.validate()?;
        let engine = FitEngine::new(self.config.policy)?;
        let resolver = GeometryResolver::new(self.formats, self.config.page.options.clone());
        let resolution = resolver.resolve(&self.stylesheet, &self.config.page.format);
        debug!(
            "Resolved page {:.1}x{:.1}px, available height {:.1}px",
            resolution.geometry.width, resolution.geometry.height, resolution.geometry.available_height
        );
        Ok(FitPipeline::new(engine, resolution, self.config.graphics))
    }
}
