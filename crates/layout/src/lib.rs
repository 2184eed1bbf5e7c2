use pagefit_traits::TreeError;
use pagefit_types::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("No box measurement is available for node {0}.")]
    MeasurementUnavailable(NodeId),
    #[error("Scale {raw} computed for the block at {heading} is not usable; clamped to {floor:.2}.")]
    DegenerateScale { heading: NodeId, raw: f32, floor: f32 },
    #[error("Invalid fit policy: {0}")]
    InvalidPolicy(String),
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}

pub mod analyzer;
pub mod applier;
pub mod block;
pub mod config;
pub mod decision;
pub mod engine;
pub mod locator;
pub mod measure;
pub mod report;

pub use self::analyzer::{OverflowAnalysis, OverflowAnalyzer};
pub use self::applier::ScalingApplier;
pub use self::block::{HeadingDiagramBlock, Severity};
pub use self::config::{FitPolicy, MAX_PASSES};
pub use self::decision::{ScalingDecision, ScalingDecisionEngine};
pub use self::engine::FitEngine;
pub use self::locator::{BlockLocator, BlockShape};
pub use self::measure::BoxMeasurer;
pub use self::report::{FitDiagnostic, FitReport, PassSummary};

#[cfg(test)]
mod test_utils;
