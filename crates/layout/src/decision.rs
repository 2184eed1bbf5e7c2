//! Scale and page-break decisions for overflowing blocks.
//!
//! ```text
//! available_for_diagram = available - heading - intervening - buffer
//! raw                   = available_for_diagram / diagram
//! severe:  raw         *= (severe_ratio / ratio) ^ severe_damping
//! scale                 = clamp(raw, floor(severity), 1.0)
//! graphic_scale         = (diagram * scale - fixed) / graphic
//! final                 = graphic * graphic_scale + fixed
//! force_break           = floor engaged
//!                         || final + heading > threshold(severity) * available
//! ```
//!
//! `fixed` is the part of the diagram that does not scale: the graphic's own
//! margins and the container's chrome. Only the graphic's border box is
//! resized, so it absorbs the whole reduction. Its scale never drops below the
//! lowest floor.
//!
//! Degenerate input (nothing left for the diagram, or a non-finite scale)
//! yields the lowest floor and an unconditional break.

use crate::analyzer::OverflowAnalysis;
use crate::block::{HeadingDiagramBlock, Severity};
use crate::config::FitPolicy;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingDecision {
    pub severity: Severity,
    pub available_for_diagram: f32,
    /// Scale before damping and clamping.
    pub raw_scale: f32,
    pub scale_factor: f32,
    /// Scale written to the graphic's border box.
    pub graphic_scale: f32,
    pub final_height: f32,
    pub force_break: bool,
    /// The damped scale fell below the floor.
    pub floor_clamped: bool,
    pub degenerate: bool,
}

impl ScalingDecision {
    /// Leave the block as it is.
    pub fn unchanged(block: &HeadingDiagramBlock) -> Self {
        Self {
            severity: Severity::None,
            available_for_diagram: 0.0,
            raw_scale: 1.0,
            scale_factor: 1.0,
            graphic_scale: 1.0,
            final_height: block.diagram_total(),
            force_break: false,
            floor_clamped: false,
            degenerate: false,
        }
    }

    pub fn changes_anything(&self) -> bool {
        self.scale_factor < 1.0 || self.force_break
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScalingDecisionEngine {
    policy: FitPolicy,
}

impl ScalingDecisionEngine {
    pub fn new(policy: FitPolicy) -> Self {
        Self { policy }
    }

    pub fn decide(&self, block: &HeadingDiagramBlock, analysis: &OverflowAnalysis) -> ScalingDecision {
        let severity = analysis.severity;
        if severity == Severity::None {
            return ScalingDecision::unchanged(block);
        }

        let available = analysis.available_height;
        let heading = block.heading_total();
        let diagram = block.diagram_total();
        let available_for_diagram =
            available - heading - block.intervening_total() - self.policy.safety_buffer;
        let raw_scale = available_for_diagram / diagram;

        if available_for_diagram <= 0.0 || !raw_scale.is_finite() || raw_scale <= 0.0 {
            let floor = self.policy.min_floor();
            let (graphic_scale, final_height) = self.resize_graphic(block, floor);
            return ScalingDecision {
                severity,
                available_for_diagram,
                raw_scale,
                scale_factor: floor,
                graphic_scale,
                final_height,
                force_break: true,
                floor_clamped: true,
                degenerate: true,
            };
        }

        let floor = self.policy.floor_for(severity);
        let damped = if severity == Severity::Severe && self.policy.severe_damping > 0.0 {
            raw_scale * (self.policy.severe_ratio / analysis.overflow_ratio).powf(self.policy.severe_damping)
        } else {
            raw_scale
        };
        let floor_clamped = damped < floor;
        let scale_factor = damped.clamp(floor, 1.0);
        let (graphic_scale, final_height) = self.resize_graphic(block, scale_factor);
        let threshold = self.policy.break_threshold_for(severity) * available;

        ScalingDecision {
            severity,
            available_for_diagram,
            raw_scale,
            scale_factor,
            graphic_scale,
            final_height,
            force_break: floor_clamped || final_height + heading > threshold,
            floor_clamped,
            degenerate: false,
        }
    }

    /// Graphic scale and resulting occupied height for a block scale.
    fn resize_graphic(&self, block: &HeadingDiagramBlock, scale: f32) -> (f32, f32) {
        let graphic = block.diagram_metrics.height;
        let fixed = block.fixed_height();
        if graphic <= 0.0 {
            return (scale, fixed);
        }
        let graphic_scale =
            ((block.diagram_total() * scale - fixed) / graphic).clamp(self.policy.min_floor(), 1.0);
        (graphic_scale, graphic * graphic_scale + fixed)
    }
}
