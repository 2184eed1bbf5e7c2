pub mod fixtures;

use pagefit::{FitConfig, FitPipeline, FitReport, PipelineBuilder, PipelineError, RenderedTree, TreeSpec};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Asserts two floats are within `eps` (default 0.01) of each other.
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        $crate::assert_close!($left, $right, 0.01)
    };
    ($left:expr, $right:expr, $eps:expr) => {{
        let (l, r): (f32, f32) = ($left, $right);
        assert!((l - r).abs() <= $eps, "expected {} to be within {} of {}", l, $eps, r);
    }};
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a pipeline from a stylesheet and configuration
pub fn pipeline_for(css: &str, config: FitConfig) -> Result<FitPipeline, PipelineError> {
    PipelineBuilder::new()
        .with_stylesheet(css)
        .with_config(config)
        .build()
}

/// Load a JSON tree and fit it, returning the mutated tree and the report
pub fn fit_json(
    css: &str,
    tree: &Value,
    config: FitConfig,
) -> Result<(RenderedTree, FitReport), PipelineError> {
    let pipeline = pipeline_for(css, config)?;
    let mut doc = pipeline.load_tree(&serde_json::to_string(tree)?)?;
    let report = pipeline.run(&mut doc);
    Ok((doc, report))
}

/// Find a node of a written-back tree by its DOM id
pub fn find_by_id<'a>(spec: &'a TreeSpec, id: &str) -> Option<&'a TreeSpec> {
    if spec.id.as_deref() == Some(id) {
        return Some(spec);
    }
    spec.children.iter().find_map(|c| find_by_id(c, id))
}
