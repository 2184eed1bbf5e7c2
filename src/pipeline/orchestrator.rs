use crate::error::PipelineError;
use log::info;
use pagefit_idf::{GraphicPolicy, RenderedTree, TreeSpec};
use pagefit_layout::{FitEngine, FitReport};
use pagefit_style::{GeometryResolution, MarginReport, PageGeometry};
use pagefit_traits::RenderedDocument;
use std::fs;
use std::path::Path;

/// A configured fitting run. Geometry is resolved once, at build time, and
/// shared by every document this pipeline fits.
#[derive(Debug, Clone)]
pub struct FitPipeline {
    engine: FitEngine,
    resolution: GeometryResolution,
    graphics: GraphicPolicy,
}

impl FitPipeline {
    pub(crate) fn new(engine: FitEngine, resolution: GeometryResolution, graphics: GraphicPolicy) -> Self {
        Self {
            engine,
            resolution,
            graphics,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.resolution.geometry
    }

    pub fn margin_report(&self) -> &MarginReport {
        &self.resolution.report
    }

    pub fn engine(&self) -> &FitEngine {
        &self.engine
    }

    /// Fits a rendered, layout-stable document in place.
    pub fn run<D: RenderedDocument + ?Sized>(&self, doc: &mut D) -> FitReport {
        let report = self
            .engine
            .run(doc, &self.resolution.geometry)
            .with_margins(self.resolution.report.clone());
        info!(
            "Fitted {} blocks ({} scaled) in {} passes",
            report.blocks.len(),
            report.scaled_blocks().count(),
            report.passes.len()
        );
        report
    }

    /// Builds an in-memory tree from its JSON form, classifying graphics with
    /// this pipeline's graphic policy.
    pub fn load_tree(&self, json: &str) -> Result<RenderedTree, PipelineError> {
        let spec: TreeSpec = serde_json::from_str(json)?;
        Ok(RenderedTree::from_spec(&spec).with_graphic_policy(self.graphics.clone()))
    }

    pub fn load_tree_file<P: AsRef<Path>>(&self, path: P) -> Result<RenderedTree, PipelineError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            PipelineError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read tree from '{}': {}", path.display(), e),
            ))
        })?;
        self.load_tree(&source)
    }
}
