use crate::block::{HeadingDiagramBlock, Severity};
use crate::config::FitPolicy;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowAnalysis {
    /// Heading, intervening elements, diagram and safety buffer.
    pub total_height: f32,
    pub available_height: f32,
    /// `total_height / available_height`; infinite when nothing is available.
    pub overflow_ratio: f32,
    pub severity: Severity,
}

impl OverflowAnalysis {
    pub fn overflows(&self) -> bool {
        self.severity != Severity::None
    }
}

/// Compares a block's measured height with the available content height.
///
/// Analysis is a pure computation over already measured values, so it can be
/// repeated at any time.
#[derive(Debug, Clone, Copy)]
pub struct OverflowAnalyzer {
    policy: FitPolicy,
}

impl OverflowAnalyzer {
    pub fn new(policy: FitPolicy) -> Self {
        Self { policy }
    }

    pub fn total_height(&self, block: &HeadingDiagramBlock) -> f32 {
        block.heading_total()
            + block.intervening_total()
            + block.diagram_total()
            + self.policy.safety_buffer
    }

    pub fn analyze(&self, block: &HeadingDiagramBlock, available_height: f32) -> OverflowAnalysis {
        let total_height = self.total_height(block);
        let overflow_ratio = if available_height > 0.0 {
            total_height / available_height
        } else {
            f32::INFINITY
        };
        OverflowAnalysis {
            total_height,
            available_height,
            overflow_ratio,
            severity: self.policy.classify(overflow_ratio),
        }
    }
}
