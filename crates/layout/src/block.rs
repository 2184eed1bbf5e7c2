use pagefit_types::{BoxMetrics, NodeId};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    #[default]
    None,
    Moderate,
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::None => "none",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        };
        f.write_str(s)
    }
}

/// A heading plus its downstream graphic, analyzed as one pagination unit.
///
/// Created by the locator, then filled in by analysis, decision and
/// application. Kept for the whole run as a diagnostic record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingDiagramBlock {
    pub heading_id: NodeId,
    pub heading_label: String,
    pub heading_metrics: BoxMetrics,
    /// Non-heading siblings between the heading and the graphic.
    pub intervening: Vec<NodeId>,
    pub intervening_metrics: Vec<BoxMetrics>,
    /// The sibling that holds the graphic (may be the graphic itself).
    pub container: NodeId,
    /// The element carrying the drawing.
    pub diagram_ref: NodeId,
    pub diagram_metrics: BoxMetrics,
    /// Margin, padding and border the container adds around the graphic.
    pub container_extra: f32,
    pub total_height: f32,
    pub overflow_ratio: f32,
    pub severity: Severity,
    /// Scale of the block's diagram part (graphic plus its fixed chrome).
    pub scale_factor: f32,
    /// Factor this run applied to the graphic's own measured height.
    pub graphic_scale: f32,
    pub force_break: bool,
    pub processed: bool,
    /// The pass that produced the current state of this record.
    pub pass: u8,
}

impl HeadingDiagramBlock {
    pub fn heading_total(&self) -> f32 {
        self.heading_metrics.total()
    }

    pub fn intervening_total(&self) -> f32 {
        self.intervening_metrics.iter().map(BoxMetrics::total).sum()
    }

    /// The graphic's occupied height including its container's chrome.
    pub fn diagram_total(&self) -> f32 {
        self.diagram_metrics.total() + self.container_extra
    }

    /// Margins of the graphic plus the container's chrome. None of it scales.
    pub fn fixed_height(&self) -> f32 {
        self.diagram_total() - self.diagram_metrics.height
    }

    /// Occupied height of the diagram part with the applied graphic scale.
    pub fn final_height(&self) -> f32 {
        self.diagram_metrics.height * self.graphic_scale + self.fixed_height()
    }
}
