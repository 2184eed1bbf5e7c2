use crate::LayoutError;
use crate::block::{HeadingDiagramBlock, Severity};
use crate::config::FitPolicy;
use crate::measure::BoxMeasurer;
use log::debug;
use pagefit_traits::{MetricsProvider, TreeQuery};
use pagefit_types::NodeId;

/// The structural part of a block, before anything is measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockShape {
    pub heading: NodeId,
    pub intervening: Vec<NodeId>,
    pub container: NodeId,
    pub target: NodeId,
}

/// Finds heading/graphic blocks in a rendered tree.
pub struct BlockLocator<'a, D: ?Sized> {
    doc: &'a D,
    policy: &'a FitPolicy,
}

impl<'a, D: TreeQuery + MetricsProvider + ?Sized> BlockLocator<'a, D> {
    pub fn new(doc: &'a D, policy: &'a FitPolicy) -> Self {
        Self { doc, policy }
    }

    /// Headings that may open a block, in document order.
    pub fn candidate_headings(&self) -> Vec<NodeId> {
        self.doc
            .query_headings()
            .into_iter()
            .filter(|h| {
                self.doc
                    .heading_level(*h)
                    .is_some_and(|level| level <= self.policy.max_heading_level)
            })
            .collect()
    }

    /// Scans the siblings after `heading` for the first graphic-bearing one.
    ///
    /// Returns `None` when another heading comes first (as a sibling or inside
    /// one) or the window runs out.
    pub fn scan(&self, heading: NodeId) -> Option<BlockShape> {
        let mut intervening = Vec::new();
        for sibling in self.doc.siblings_of(heading, self.policy.scan_window) {
            if self.doc.is_heading(sibling) || self.doc.contains_heading(sibling) {
                return None;
            }
            if let Some(target) = self.doc.graphic_target(sibling) {
                return Some(BlockShape {
                    heading,
                    intervening,
                    container: sibling,
                    target,
                });
            }
            intervening.push(sibling);
        }
        None
    }

    /// Locates and measures the block opened by `heading`.
    ///
    /// A graphic that already carries a fit marker yields a block that is
    /// processed, with the recorded scale.
    pub fn locate(
        &self,
        heading: NodeId,
        pass: u8,
    ) -> Result<Option<HeadingDiagramBlock>, LayoutError> {
        let Some(shape) = self.scan(heading) else {
            debug!(
                "No graphic within {} siblings of {}",
                self.policy.scan_window,
                self.doc.describe(heading)
            );
            return Ok(None);
        };

        let measurer = BoxMeasurer::new(self.doc);
        let heading_metrics = measurer.measure(shape.heading)?;
        let intervening_metrics = measurer.measure_all(&shape.intervening)?;
        let diagram_metrics = measurer.measure(shape.target)?;
        let container_extra = if shape.container == shape.target {
            0.0
        } else {
            let container = measurer.measure(shape.container)?;
            (container.total() - diagram_metrics.total()).max(0.0)
        };

        let marker = self.doc.fit_marker(shape.target);
        let block = HeadingDiagramBlock {
            heading_id: heading,
            heading_label: self.doc.describe(heading),
            heading_metrics,
            intervening: shape.intervening,
            intervening_metrics,
            container: shape.container,
            diagram_ref: shape.target,
            diagram_metrics,
            container_extra,
            total_height: 0.0,
            overflow_ratio: 0.0,
            severity: Severity::None,
            scale_factor: marker.unwrap_or(1.0),
            graphic_scale: 1.0,
            force_break: false,
            processed: marker.is_some(),
            pass,
        };
        debug!(
            "Located block {} -> {} ({} intervening){}",
            block.heading_label,
            self.doc.describe(block.diagram_ref),
            block.intervening.len(),
            if block.processed { ", already fitted" } else { "" }
        );
        Ok(Some(block))
    }
}
