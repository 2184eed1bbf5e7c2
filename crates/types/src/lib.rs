pub mod geometry;
pub mod ids;
pub mod metrics;

pub use geometry::Size;
pub use ids::NodeId;
pub use metrics::{BoxMetrics, BoxSizing, RawBoxModel};
