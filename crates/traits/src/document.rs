//! Traits abstracting the rendered document the fitting engine works on.
//!
//! The engine never lays anything out itself. It asks a rendering engine (or
//! any stand-in, such as a pre-computed metrics feed) three kinds of questions:
//!
//! - [`TreeQuery`]: structure. Which nodes are headings, what follows them,
//!   which nodes carry graphics.
//! - [`MetricsProvider`]: measurement. The box model of a node in a
//!   layout-stable snapshot.
//! - [`TreeWriter`]: mutation. Writing size directives back and triggering a
//!   reflow before the next pass.

use crate::directives::FitDirectives;
use pagefit_types::{NodeId, RawBoxModel};
use std::collections::BTreeMap;
use thiserror::Error;

/// Error type for tree mutation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Node {0} does not exist in the tree")]
    UnknownNode(NodeId),

    #[error("Node {0} is detached from the document")]
    Detached(NodeId),

    #[error("Invalid directive for node {node}: {message}")]
    InvalidDirective { node: NodeId, message: String },

    #[error("Reflow failed: {0}")]
    Reflow(String),
}

/// Read access to the structure of a rendered document tree.
pub trait TreeQuery {
    /// All heading nodes, in document order.
    fn query_headings(&self) -> Vec<NodeId>;

    /// Up to `limit` siblings following `node`, in document order.
    ///
    /// # Arguments
    ///
    /// * `node` - The node whose following siblings are requested
    /// * `limit` - The maximum number of siblings to return
    fn siblings_of(&self, node: NodeId, limit: usize) -> Vec<NodeId>;

    /// The heading level (1 = h1) if `node` is a heading.
    fn heading_level(&self, node: NodeId) -> Option<u8>;

    /// Check if a node is a heading of any level.
    fn is_heading(&self, node: NodeId) -> bool {
        self.heading_level(node).is_some()
    }

    /// Whether a heading occurs anywhere below `node`. Such a node opens a new
    /// section and ends the scan for the preceding heading.
    fn contains_heading(&self, node: NodeId) -> bool;

    /// Check if a node is graphic-bearing: an inline vector graphic, an
    /// embedded raster pointing at a graphic output, or a wrapper around one.
    fn is_graphic(&self, node: NodeId) -> bool;

    /// The element that carries the drawing for a graphic-bearing node.
    ///
    /// # Returns
    ///
    /// `node` itself when it is the graphic, its first graphic descendant when
    /// it is a wrapper (including a paragraph holding nothing but a graphic),
    /// or `None` when it bears no graphic.
    fn graphic_target(&self, node: NodeId) -> Option<NodeId>;

    /// The scale factor this engine previously applied to `node`, if any.
    fn fit_marker(&self, node: NodeId) -> Option<f32>;

    /// A short human-readable label for diagnostics (e.g. `h2#setup`).
    fn describe(&self, node: NodeId) -> String;
}

/// The measurement capability of a rendering engine.
///
/// Implementations must only be queried against a fully rendered,
/// layout-stable tree. Measuring is a pure read.
pub trait MetricsProvider {
    /// Returns the raw box model of `node`, or `None` when no measurement is
    /// available (e.g. the node is detached or not rendered).
    fn measure_raw(&self, node: NodeId) -> Option<RawBoxModel>;
}

/// Write access used to apply fitting decisions.
pub trait TreeWriter {
    /// Applies every directive of one block in a single step.
    ///
    /// Implementations validate both nodes before writing anything, so a
    /// failure leaves the tree untouched.
    ///
    /// # Arguments
    ///
    /// * `target` - The graphic element receiving the size directive
    /// * `container` - The block-level sibling that holds the graphic (may equal `target`)
    /// * `directives` - The resolved directives
    fn apply_fit(
        &mut self,
        target: NodeId,
        container: NodeId,
        directives: &FitDirectives,
    ) -> Result<(), TreeError>;

    /// Re-measure barrier: makes previously applied directives take visual
    /// effect so later measurements reflect them.
    fn reflow(&mut self) -> Result<(), TreeError> {
        Ok(())
    }
}

/// Everything the fitting engine needs from a rendered document.
pub trait RenderedDocument: TreeQuery + MetricsProvider + TreeWriter {}

impl<T: TreeQuery + MetricsProvider + TreeWriter> RenderedDocument for T {}

/// A pre-computed metrics feed.
///
/// Box models are recorded up front (for example exported from a headless
/// layout run) and served back by node id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecomputedMetrics {
    boxes: BTreeMap<NodeId, RawBoxModel>,
}

impl PrecomputedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the box model of a node.
    pub fn insert(&mut self, node: NodeId, model: RawBoxModel) {
        self.boxes.insert(node, model);
    }

    /// Removes a node's measurement, making it unavailable.
    pub fn remove(&mut self, node: NodeId) -> Option<RawBoxModel> {
        self.boxes.remove(&node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut RawBoxModel> {
        self.boxes.get_mut(&node)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl MetricsProvider for PrecomputedMetrics {
    fn measure_raw(&self, node: NodeId) -> Option<RawBoxModel> {
        self.boxes.get(&node).copied()
    }
}
