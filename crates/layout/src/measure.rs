//! Box measurement on top of a rendering engine's metrics capability.
//!
//! [`BoxMeasurer`] never lays anything out. It asks a [`MetricsProvider`] for
//! the raw box model of a node and normalizes it into [`BoxMetrics`]:
//!
//! - `height` is always the visual border box. A content-box report gets its
//!   padding and border added exactly once; a border-box report is taken as is.
//! - Margins are carried separately and never folded into `height`. Callers
//!   add them through [`BoxMetrics::total`].
//! - Non-finite numbers become zero, and negative sizes are clamped to zero.
//!   Margins keep their sign because negative margins are legal and are used
//!   to compensate transforms.

use crate::LayoutError;
use log::trace;
use pagefit_traits::MetricsProvider;
use pagefit_types::{BoxMetrics, BoxSizing, NodeId, RawBoxModel};

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

fn size(value: f32) -> f32 {
    finite_or_zero(value).max(0.0)
}

/// Converts a raw box model into normalized metrics.
pub fn normalize(raw: &RawBoxModel) -> BoxMetrics {
    let padding_top = size(raw.padding_top);
    let padding_bottom = size(raw.padding_bottom);
    let border_top = size(raw.border_top);
    let border_bottom = size(raw.border_bottom);
    let chrome = padding_top + padding_bottom + border_top + border_bottom;

    let height = match raw.box_sizing {
        BoxSizing::BorderBox => size(raw.height),
        BoxSizing::ContentBox => size(raw.height) + chrome,
    };

    BoxMetrics {
        height,
        width: size(raw.width),
        margin_top: finite_or_zero(raw.margin_top),
        margin_bottom: finite_or_zero(raw.margin_bottom),
        padding_top,
        padding_bottom,
        border_top,
        border_bottom,
    }
}

pub struct BoxMeasurer<'a, P: ?Sized> {
    provider: &'a P,
}

impl<'a, P: MetricsProvider + ?Sized> BoxMeasurer<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Measures one node of a layout-stable tree.
    pub fn measure(&self, node: NodeId) -> Result<BoxMetrics, LayoutError> {
        let raw = self
            .provider
            .measure_raw(node)
            .ok_or(LayoutError::MeasurementUnavailable(node))?;
        let metrics = normalize(&raw);
        trace!(
            "Measured {}: height {:.1}, margins {:.1}/{:.1}",
            node, metrics.height, metrics.margin_top, metrics.margin_bottom
        );
        Ok(metrics)
    }

    /// Measures several nodes, failing on the first one without a measurement.
    pub fn measure_all(&self, nodes: &[NodeId]) -> Result<Vec<BoxMetrics>, LayoutError> {
        nodes.iter().map(|n| self.measure(*n)).collect()
    }
}
