//! The two-pass fitting loop.
//!
//! Pass 1 runs locate, analyze, decide and apply over every candidate heading.
//! If it found at least one overflow, the tree is reflowed and pass 2 runs the
//! same steps over the blocks that are not processed yet, because scaling can
//! push previously fitting neighbours over the edge. A processed block is
//! never revisited and there are at most [`MAX_PASSES`] passes.

use crate::LayoutError;
use crate::analyzer::OverflowAnalyzer;
use crate::applier::ScalingApplier;
use crate::block::HeadingDiagramBlock;
use crate::config::{FitPolicy, MAX_PASSES};
use crate::decision::ScalingDecisionEngine;
use crate::locator::BlockLocator;
use crate::report::{FitReport, PassSummary};
use log::{debug, info};
use pagefit_style::PageGeometry;
use pagefit_traits::RenderedDocument;
use pagefit_types::NodeId;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct FitEngine {
    policy: FitPolicy,
    analyzer: OverflowAnalyzer,
    decider: ScalingDecisionEngine,
    applier: ScalingApplier,
}

impl FitEngine {
    pub fn new(policy: FitPolicy) -> Result<Self, LayoutError> {
        policy.validate()?;
        Ok(Self {
            policy,
            analyzer: OverflowAnalyzer::new(policy),
            decider: ScalingDecisionEngine::new(policy),
            applier: ScalingApplier::new(policy),
        })
    }

    pub fn policy(&self) -> &FitPolicy {
        &self.policy
    }

    /// Fits every block of a rendered, layout-stable document to `geometry`.
    ///
    /// Never fails: a block that cannot be measured or written is left
    /// unscaled and reported as a diagnostic.
    pub fn run<D: RenderedDocument + ?Sized>(&self, doc: &mut D, geometry: &PageGeometry) -> FitReport {
        self.run_with_available_height(doc, geometry.available_height)
    }

    pub fn run_with_available_height<D: RenderedDocument + ?Sized>(
        &self,
        doc: &mut D,
        available_height: f32,
    ) -> FitReport {
        let mut report = FitReport::new(available_height);
        let mut blocks: BTreeMap<NodeId, HeadingDiagramBlock> = BTreeMap::new();

        for pass in 1..=MAX_PASSES {
            let (summary, wrote) = self.run_pass(doc, available_height, pass, &mut blocks, &mut report);
            let found_overflow = summary.overflowing > 0;
            info!(
                "Fit pass {}: {} examined, {} overflowing, {} scaled, {} forced breaks",
                pass, summary.examined, summary.overflowing, summary.scaled, summary.forced_breaks
            );
            report.passes.push(summary);

            if wrote {
                if let Err(e) = doc.reflow() {
                    report.warn(None, pass, format!("Reflow after pass {} failed: {}", pass, e));
                    break;
                }
            }
            if !found_overflow {
                break;
            }
        }

        report.blocks = blocks.into_values().collect();
        report
    }

    fn run_pass<D: RenderedDocument + ?Sized>(
        &self,
        doc: &mut D,
        available_height: f32,
        pass: u8,
        blocks: &mut BTreeMap<NodeId, HeadingDiagramBlock>,
        report: &mut FitReport,
    ) -> (PassSummary, bool) {
        let mut summary = PassSummary {
            pass,
            ..Default::default()
        };
        let mut wrote = false;
        let headings = BlockLocator::new(&*doc, &self.policy).candidate_headings();

        for heading in headings {
            if blocks.get(&heading).is_some_and(|b| b.processed) {
                continue;
            }
            summary.examined += 1;

            let located = BlockLocator::new(&*doc, &self.policy).locate(heading, pass);
            let mut block = match located {
                Ok(Some(block)) => block,
                Ok(None) => continue,
                Err(e) => {
                    summary.skipped += 1;
                    report.warn(
                        Some(heading),
                        pass,
                        format!("Skipping block at {}: {}", doc.describe(heading), e),
                    );
                    continue;
                }
            };
            summary.located += 1;

            if block.processed {
                summary.already_fitted += 1;
                blocks.insert(heading, block);
                continue;
            }

            let analysis = self.analyzer.analyze(&block, available_height);
            block.total_height = analysis.total_height;
            block.overflow_ratio = analysis.overflow_ratio;
            block.severity = analysis.severity;
            debug!(
                "{}: total {:.1}px of {:.1}px, ratio {:.3} ({})",
                block.heading_label,
                analysis.total_height,
                available_height,
                analysis.overflow_ratio,
                analysis.severity
            );

            if !analysis.overflows() {
                summary.fitting += 1;
                blocks.insert(heading, block);
                continue;
            }
            summary.overflowing += 1;

            let decision = self.decider.decide(&block, &analysis);
            if decision.degenerate {
                let e = LayoutError::DegenerateScale {
                    heading,
                    raw: decision.raw_scale,
                    floor: decision.scale_factor,
                };
                report.warn(Some(heading), pass, format!("{}: {}", block.heading_label, e));
            }

            match self.applier.apply(doc, &mut block, &decision) {
                Ok(directives) => {
                    wrote = true;
                    summary.scaled += 1;
                    if directives.force_break {
                        summary.forced_breaks += 1;
                    }
                }
                Err(e) => {
                    summary.skipped += 1;
                    report.warn(
                        Some(heading),
                        pass,
                        format!("Leaving {} unscaled: {}", block.heading_label, e),
                    );
                }
            }
            blocks.insert(heading, block);
        }

        (summary, wrote)
    }
}
