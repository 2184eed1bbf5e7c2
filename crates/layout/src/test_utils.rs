use crate::block::{HeadingDiagramBlock, Severity};
use pagefit_types::{BoxMetrics, NodeId, RawBoxModel};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A heading box with no margins, so its total equals `height`.
pub fn heading_box(height: f32) -> RawBoxModel {
    RawBoxModel::border_box(600.0, height)
}

pub fn plain_box(height: f32) -> RawBoxModel {
    RawBoxModel::border_box(600.0, height)
}

/// A block with the given totals, for analysis and decision tests.
pub fn block_with(heading: f32, intervening: &[f32], diagram: f32) -> HeadingDiagramBlock {
    HeadingDiagramBlock {
        heading_id: NodeId::new(1),
        heading_label: "h2".to_string(),
        heading_metrics: BoxMetrics::of_height(heading),
        intervening: (0..intervening.len()).map(|i| NodeId::new(2 + i)).collect(),
        intervening_metrics: intervening.iter().map(|h| BoxMetrics::of_height(*h)).collect(),
        container: NodeId::new(100),
        diagram_ref: NodeId::new(100),
        diagram_metrics: BoxMetrics {
            width: 600.0,
            ..BoxMetrics::of_height(diagram)
        },
        container_extra: 0.0,
        total_height: 0.0,
        overflow_ratio: 0.0,
        severity: Severity::None,
        scale_factor: 1.0,
        graphic_scale: 1.0,
        force_break: false,
        processed: false,
        pass: 1,
    }
}
