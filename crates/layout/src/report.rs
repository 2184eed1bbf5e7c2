//! Structured record of a fitting run, for a verbose/debug surface.

use crate::block::{HeadingDiagramBlock, Severity};
use itertools::Itertools;
use pagefit_style::{DiagnosticLevel, MarginReport};
use pagefit_types::NodeId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitDiagnostic {
    pub level: DiagnosticLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<NodeId>,
    pub pass: u8,
    pub message: String,
}

/// Counters for one pass of the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSummary {
    pub pass: u8,
    /// Headings looked at (excluding blocks processed earlier in the run).
    pub examined: usize,
    pub located: usize,
    pub fitting: usize,
    pub overflowing: usize,
    pub scaled: usize,
    pub forced_breaks: usize,
    /// Blocks whose graphic already carried a fit marker.
    pub already_fitted: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitReport {
    pub available_height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<MarginReport>,
    /// Every located block, ordered by heading.
    pub blocks: Vec<HeadingDiagramBlock>,
    pub passes: Vec<PassSummary>,
    pub diagnostics: Vec<FitDiagnostic>,
}

impl FitReport {
    pub fn new(available_height: f32) -> Self {
        Self {
            available_height,
            ..Default::default()
        }
    }

    pub fn with_margins(mut self, margins: MarginReport) -> Self {
        self.margins = Some(margins);
        self
    }

    pub fn warn(&mut self, heading: Option<NodeId>, pass: u8, message: String) {
        log::warn!("{}", message);
        self.diagnostics.push(FitDiagnostic {
            level: DiagnosticLevel::Warning,
            heading,
            pass,
            message,
        });
    }

    pub fn block(&self, heading: NodeId) -> Option<&HeadingDiagramBlock> {
        self.blocks.iter().find(|b| b.heading_id == heading)
    }

    pub fn scaled_blocks(&self) -> impl Iterator<Item = &HeadingDiagramBlock> {
        self.blocks.iter().filter(|b| b.processed && b.scale_factor < 1.0)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &FitDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }

    /// Human-readable summary: margins, one line per pass, one line per
    /// overflowing block, then diagnostics.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(margins) = &self.margins {
            lines.push(format!(
                "margins {} ({})",
                margins.margins.to_shorthand(),
                if margins.symmetric { "symmetric" } else { "asymmetric" }
            ));
            lines.extend(margins.diagnostics.iter().map(|d| format!("  {}", d.message)));
        }
        lines.push(format!("available height {:.1}px", self.available_height));
        for pass in &self.passes {
            lines.push(format!(
                "pass {}: examined {}, located {}, overflowing {}, scaled {}, breaks {}, skipped {}",
                pass.pass,
                pass.examined,
                pass.located,
                pass.overflowing,
                pass.scaled,
                pass.forced_breaks,
                pass.skipped
            ));
        }
        for block in self.blocks.iter().filter(|b| b.severity != Severity::None) {
            let flags = [
                block.force_break.then_some("force-break"),
                (!block.processed).then_some("unscaled"),
            ]
            .into_iter()
            .flatten()
            .join(", ");
            lines.push(format!(
                "  {} ratio {:.2} ({}) scale {:.3}{}",
                block.heading_label,
                block.overflow_ratio,
                block.severity,
                block.scale_factor,
                if flags.is_empty() { String::new() } else { format!(" [{}]", flags) }
            ));
        }
        lines.extend(self.diagnostics.iter().map(|d| format!("  pass {}: {}", d.pass, d.message)));
        lines
    }
}
