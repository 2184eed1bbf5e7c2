use crate::LayoutError;
use crate::block::HeadingDiagramBlock;
use crate::config::FitPolicy;
use crate::decision::ScalingDecision;
use log::debug;
use pagefit_traits::{FitDirectives, TreeWriter};
use pagefit_types::Size;

/// Writes scaling decisions back to the document.
#[derive(Debug, Clone, Copy)]
pub struct ScalingApplier {
    policy: FitPolicy,
}

impl ScalingApplier {
    pub fn new(policy: FitPolicy) -> Self {
        Self { policy }
    }

    pub fn directives_for(
        &self,
        block: &HeadingDiagramBlock,
        decision: &ScalingDecision,
    ) -> FitDirectives {
        let original = Size::new(block.diagram_metrics.width, block.diagram_metrics.height);
        FitDirectives::new(
            original,
            decision.scale_factor,
            self.policy.strategy,
            decision.force_break,
            self.policy.trailing_margin,
        )
        .with_graphic_scale(decision.graphic_scale)
    }

    /// Applies `decision` to the tree and records it on the block.
    ///
    /// The block is only updated once the write succeeded; on error it keeps
    /// its unscaled state and nothing in the tree has changed.
    pub fn apply<W: TreeWriter + ?Sized>(
        &self,
        doc: &mut W,
        block: &mut HeadingDiagramBlock,
        decision: &ScalingDecision,
    ) -> Result<FitDirectives, LayoutError> {
        let directives = self.directives_for(block, decision);
        doc.apply_fit(block.diagram_ref, block.container, &directives)?;

        block.scale_factor = decision.scale_factor;
        block.graphic_scale = decision.graphic_scale;
        block.force_break = decision.force_break;
        block.processed = true;
        debug!(
            "Applied scale {:.3} to {} ({:.1}x{:.1}px), force break: {}",
            directives.scale_factor,
            block.heading_label,
            directives.width,
            directives.height,
            directives.force_break
        );
        Ok(directives)
    }
}
