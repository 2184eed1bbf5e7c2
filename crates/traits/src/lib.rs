pub mod directives;
pub mod document;

pub use directives::{
    FitDirectives, SizeStrategy, ATTR_FIT_PROCESSED, ATTR_FIT_SCALE, ATTR_FORCE_BREAK,
};
pub use document::{
    MetricsProvider, PrecomputedMetrics, RenderedDocument, TreeError, TreeQuery, TreeWriter,
};
