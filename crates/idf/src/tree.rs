use crate::graphics::GraphicPolicy;
use crate::node::{ElementKind, Node};
use log::debug;
use pagefit_traits::{
    FitDirectives, MetricsProvider, PrecomputedMetrics, SizeStrategy, TreeError, TreeQuery,
    TreeWriter, ATTR_FIT_SCALE,
};
use pagefit_types::{BoxSizing, NodeId, RawBoxModel};

/// A directive written by `apply_fit` that has not taken visual effect yet.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingFit {
    target: NodeId,
    container: NodeId,
    directives: FitDirectives,
}

/// An arena-backed rendered document.
///
/// Node 0 is the root (a `body` element). Box models live in a
/// [`PrecomputedMetrics`] feed; directives written through [`TreeWriter`] are
/// reflected in that feed only after [`TreeWriter::reflow`].
#[derive(Debug, Clone)]
pub struct RenderedTree {
    nodes: Vec<Node>,
    metrics: PrecomputedMetrics,
    graphics: GraphicPolicy,
    pending: Vec<PendingFit>,
}

impl Default for RenderedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderedTree {
    pub fn new() -> Self {
        Self::with_root(ElementKind::Other("body".to_string()))
    }

    pub fn with_root(kind: ElementKind) -> Self {
        Self {
            nodes: vec![Node::new(kind, None)],
            metrics: PrecomputedMetrics::new(),
            graphics: GraphicPolicy::default(),
            pending: Vec::new(),
        }
    }

    pub fn with_graphic_policy(mut self, graphics: GraphicPolicy) -> Self {
        self.graphics = graphics;
        self
    }

    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Appends a measured child to `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this tree.
    pub fn append(&mut self, parent: NodeId, kind: ElementKind, model: RawBoxModel) -> NodeId {
        let id = self.append_unmeasured(parent, kind);
        self.metrics.insert(id, model);
        id
    }

    /// Appends a child without a measurement.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this tree.
    pub fn append_unmeasured(&mut self, parent: NodeId, kind: ElementKind) -> NodeId {
        assert!(parent.index() < self.nodes.len(), "unknown parent {}", parent);
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(kind, Some(parent)));
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Sets the DOM id of a node, returning `self` for chaining.
    pub fn set_dom_id(&mut self, node: NodeId, dom_id: impl Into<String>) -> &mut Self {
        if let Some(n) = self.node_mut(node) {
            n.dom_id = Some(dom_id.into());
        }
        self
    }

    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        if let Some(n) = self.node_mut(node) {
            n.attributes.insert(name.into(), value.into());
        }
        self
    }

    pub fn set_box(&mut self, node: NodeId, model: RawBoxModel) {
        self.metrics.insert(node, model);
    }

    /// Removes a node (and its subtree) from its parent. The node keeps its
    /// id but can no longer be measured or written.
    pub fn detach(&mut self, node: NodeId) -> Result<(), TreeError> {
        let parent = self
            .node(node)
            .ok_or(TreeError::UnknownNode(node))?
            .parent
            .ok_or(TreeError::Detached(node))?;
        self.nodes[parent.index()].children.retain(|c| *c != node);
        self.nodes[node.index()].parent = None;
        Ok(())
    }

    /// Whether `node` is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root() {
                return true;
            }
            match self.node(current).and_then(Node::parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Nodes in document (pre-)order, starting at the root.
    pub fn document_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    /// Number of directives waiting for the next reflow.
    pub fn pending_fits(&self) -> usize {
        self.pending.len()
    }

    fn checked(&self, node: NodeId) -> Result<&Node, TreeError> {
        let n = self.node(node).ok_or(TreeError::UnknownNode(node))?;
        if !self.is_attached(node) {
            return Err(TreeError::Detached(node));
        }
        Ok(n)
    }

    fn is_graphic_leaf(&self, node: &Node) -> bool {
        match &node.kind {
            ElementKind::Svg => true,
            ElementKind::Image { src } => self.graphics.matches(src),
            _ => false,
        }
    }

    fn first_graphic_descendant(&self, node: NodeId) -> Option<NodeId> {
        self.descendants(node)
            .into_iter()
            .find(|id| self.node(*id).is_some_and(|n| self.is_graphic_leaf(n)))
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self
            .node(node)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            found.push(id);
            if let Some(n) = self.node(id) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        found
    }

    fn adjust_ancestors(&mut self, from: NodeId, delta: f32) {
        let mut current = self.node(from).and_then(Node::parent);
        while let Some(id) = current {
            if let Some(model) = self.metrics.get_mut(id) {
                model.height = (model.height + delta).max(0.0);
            }
            current = self.node(id).and_then(Node::parent);
        }
    }
}

impl TreeQuery for RenderedTree {
    fn query_headings(&self) -> Vec<NodeId> {
        self.document_order()
            .into_iter()
            .filter(|id| self.heading_level(*id).is_some())
            .collect()
    }

    fn siblings_of(&self, node: NodeId, limit: usize) -> Vec<NodeId> {
        let Some(parent) = self.node(node).and_then(Node::parent) else {
            return Vec::new();
        };
        let siblings = &self.nodes[parent.index()].children;
        siblings
            .iter()
            .position(|s| *s == node)
            .map(|pos| siblings.iter().skip(pos + 1).take(limit).copied().collect())
            .unwrap_or_default()
    }

    fn heading_level(&self, node: NodeId) -> Option<u8> {
        self.node(node).and_then(|n| n.kind.heading_level())
    }

    fn contains_heading(&self, node: NodeId) -> bool {
        self.descendants(node)
            .into_iter()
            .any(|id| self.heading_level(id).is_some())
    }

    fn is_graphic(&self, node: NodeId) -> bool {
        self.graphic_target(node).is_some()
    }

    fn graphic_target(&self, node: NodeId) -> Option<NodeId> {
        let n = self.node(node)?;
        if self.is_graphic_leaf(n) {
            Some(node)
        } else if n.kind.is_wrapper() {
            self.first_graphic_descendant(node)
        } else if n.kind == ElementKind::Paragraph {
            // `<p><img src="diagram.svg"></p>` as emitted by markdown renderers.
            match n.children.as_slice() {
                [only] => self.graphic_target(*only),
                _ => None,
            }
        } else {
            None
        }
    }

    fn fit_marker(&self, node: NodeId) -> Option<f32> {
        self.node(node)?
            .attribute(ATTR_FIT_SCALE)
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| v.is_finite())
    }

    fn describe(&self, node: NodeId) -> String {
        self.node(node)
            .map(Node::label)
            .unwrap_or_else(|| format!("unknown{}", node))
    }
}

impl MetricsProvider for RenderedTree {
    fn measure_raw(&self, node: NodeId) -> Option<RawBoxModel> {
        if !self.is_attached(node) {
            return None;
        }
        self.metrics.measure_raw(node)
    }
}

impl TreeWriter for RenderedTree {
    fn apply_fit(
        &mut self,
        target: NodeId,
        container: NodeId,
        directives: &FitDirectives,
    ) -> Result<(), TreeError> {
        // Validate everything before the first write.
        self.checked(target)?;
        self.checked(container)?;
        for scale in [directives.scale_factor, directives.graphic_scale] {
            if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
                return Err(TreeError::InvalidDirective {
                    node: target,
                    message: format!("scale factor {} outside (0, 1]", scale),
                });
            }
        }
        if !directives.trailing_margin_delta.is_finite() {
            return Err(TreeError::InvalidDirective {
                node: container,
                message: "non-finite trailing margin".to_string(),
            });
        }
        let container_margin = self
            .metrics
            .measure_raw(container)
            .ok_or(TreeError::InvalidDirective {
                node: container,
                message: "container has no box model".to_string(),
            })?
            .margin_bottom;
        let container_margin = if target == container && directives.strategy == SizeStrategy::Transform
        {
            container_margin - directives.height_reduction()
        } else {
            container_margin
        };

        let target_node = &mut self.nodes[target.index()];
        for (property, value) in directives.target_declarations() {
            target_node.styles.insert(property.to_string(), value);
        }
        for (name, value) in directives.target_attributes() {
            target_node.attributes.insert(name.to_string(), value);
        }
        let container_node = &mut self.nodes[container.index()];
        for (property, value) in directives.container_declarations(container_margin) {
            container_node.styles.insert(property.to_string(), value);
        }
        for (name, value) in directives.container_attributes() {
            container_node.attributes.insert(name.to_string(), value);
        }

        self.pending.push(PendingFit {
            target,
            container,
            directives: *directives,
        });
        Ok(())
    }

    fn reflow(&mut self) -> Result<(), TreeError> {
        let pending = std::mem::take(&mut self.pending);
        for fit in pending {
            let reduction = fit.directives.height_reduction();
            if let Some(model) = self.metrics.get_mut(fit.target) {
                match fit.directives.strategy {
                    SizeStrategy::ExplicitSize => {
                        model.width = fit.directives.width;
                        model.height = match model.box_sizing {
                            BoxSizing::BorderBox => fit.directives.height,
                            BoxSizing::ContentBox => {
                                (model.height - reduction).max(0.0)
                            }
                        };
                    }
                    // The layout box keeps its size; the negative margin gives
                    // the space back.
                    SizeStrategy::Transform => model.margin_bottom -= reduction,
                }
            }
            self.adjust_ancestors(fit.target, -reduction);

            let delta = fit.directives.trailing_margin_delta;
            if let Some(model) = self.metrics.get_mut(fit.container) {
                model.margin_bottom += delta;
            }
            self.adjust_ancestors(fit.container, delta);

            debug!(
                "Reflowed {} (scale {:.3}, -{:.1}px) in {}",
                self.describe(fit.target),
                fit.directives.graphic_scale,
                reduction,
                self.describe(fit.container)
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagefit_traits::{ATTR_FIT_PROCESSED, ATTR_FORCE_BREAK};
    use pagefit_types::Size;

    fn sample() -> (RenderedTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = RenderedTree::new();
        let root = tree.root();
        tree.set_box(root, RawBoxModel::border_box(700.0, 1000.0));
        let heading = tree.append(
            root,
            ElementKind::Heading(2),
            RawBoxModel::border_box(700.0, 40.0).with_margins(10.0, 10.0),
        );
        tree.set_dom_id(heading, "setup");
        let para = tree.append(root, ElementKind::Paragraph, RawBoxModel::border_box(700.0, 30.0));
        let figure = tree.append(
            root,
            ElementKind::Figure,
            RawBoxModel::border_box(700.0, 820.0).with_margins(0.0, 16.0),
        );
        let svg = tree.append(figure, ElementKind::Svg, RawBoxModel::border_box(600.0, 800.0));
        (tree, heading, para, figure, svg)
    }

    #[test]
    fn structure_queries() {
        let (tree, heading, para, figure, svg) = sample();
        assert_eq!(tree.query_headings(), vec![heading]);
        assert_eq!(tree.siblings_of(heading, 5), vec![para, figure]);
        assert_eq!(tree.siblings_of(heading, 1), vec![para]);
        assert!(tree.siblings_of(figure, 5).is_empty());
        assert!(tree.is_heading(heading));
        assert!(tree.is_graphic(figure));
        assert!(!tree.is_graphic(para));
        assert_eq!(tree.graphic_target(figure), Some(svg));
        assert_eq!(tree.graphic_target(svg), Some(svg));
        assert_eq!(tree.describe(heading), "h2#setup");
    }

    #[test]
    fn paragraph_holding_only_a_graphic_is_a_wrapper() {
        let mut tree = RenderedTree::new();
        let root = tree.root();
        let p = tree.append_unmeasured(root, ElementKind::Paragraph);
        let img = tree.append_unmeasured(p, ElementKind::Image { src: "out/diagram-1.svg".into() });
        let mixed = tree.append_unmeasured(root, ElementKind::Paragraph);
        tree.append_unmeasured(mixed, ElementKind::Image { src: "out/diagram-2.svg".into() });
        tree.append_unmeasured(mixed, ElementKind::Other("span".into()));

        assert_eq!(tree.graphic_target(p), Some(img));
        assert!(!tree.is_graphic(mixed));
    }

    #[test]
    fn nested_headings_are_found() {
        let mut tree = RenderedTree::new();
        let root = tree.root();
        let section = tree.append_unmeasured(root, ElementKind::Block { class: None });
        tree.append_unmeasured(section, ElementKind::Heading(2));
        let figure = tree.append_unmeasured(root, ElementKind::Figure);
        tree.append_unmeasured(figure, ElementKind::Svg);

        assert!(tree.contains_heading(section));
        assert!(!tree.contains_heading(figure));
        assert_eq!(tree.query_headings().len(), 1);
    }

    #[test]
    fn images_count_only_when_marked_as_graphic_output() {
        let mut tree = RenderedTree::new();
        let root = tree.root();
        let photo = tree.append_unmeasured(root, ElementKind::Image { src: "photo.jpg".into() });
        let chart = tree.append_unmeasured(root, ElementKind::Image { src: "out/diagram-1.png".into() });
        assert!(!tree.is_graphic(photo));
        assert!(tree.is_graphic(chart));
    }

    #[test]
    fn detached_nodes_cannot_be_measured_or_written() {
        let (mut tree, _, _, figure, svg) = sample();
        tree.detach(figure).unwrap();
        assert!(tree.measure_raw(svg).is_none());
        let d = FitDirectives::new(Size::new(600.0, 800.0), 0.5, SizeStrategy::ExplicitSize, false, 24.0);
        assert_eq!(tree.apply_fit(svg, figure, &d), Err(TreeError::Detached(svg)));
        assert_eq!(tree.detach(figure), Err(TreeError::Detached(figure)));
    }

    #[test]
    fn apply_fit_is_atomic() {
        let (mut tree, _, _, figure, svg) = sample();
        let bad = FitDirectives::new(Size::new(600.0, 800.0), f32::NAN, SizeStrategy::ExplicitSize, true, 24.0);
        assert!(matches!(
            tree.apply_fit(svg, figure, &bad),
            Err(TreeError::InvalidDirective { .. })
        ));
        assert!(tree.node(svg).unwrap().styles.is_empty());
        assert!(tree.node(figure).unwrap().attributes.is_empty());
        assert_eq!(tree.pending_fits(), 0);

        let unknown = NodeId::new(99);
        let ok = FitDirectives::new(Size::new(600.0, 800.0), 0.5, SizeStrategy::ExplicitSize, true, 24.0);
        assert_eq!(tree.apply_fit(svg, unknown, &ok), Err(TreeError::UnknownNode(unknown)));
        assert!(tree.node(svg).unwrap().styles.is_empty());
    }

    #[test]
    fn measurements_change_only_after_reflow() {
        let (mut tree, _, _, figure, svg) = sample();
        let d = FitDirectives::new(Size::new(600.0, 800.0), 0.5, SizeStrategy::ExplicitSize, true, 24.0);
        tree.apply_fit(svg, figure, &d).unwrap();

        let svg_node = tree.node(svg).unwrap();
        assert_eq!(svg_node.style("height"), Some("400.00px"));
        assert_eq!(svg_node.attribute(ATTR_FIT_PROCESSED), Some("true"));
        let figure_node = tree.node(figure).unwrap();
        assert_eq!(figure_node.attribute(ATTR_FORCE_BREAK), Some("true"));
        assert_eq!(figure_node.style("margin-bottom"), Some("40.00px"));
        assert_eq!(tree.fit_marker(svg), Some(0.5));

        assert_eq!(tree.measure_raw(svg).unwrap().height, 800.0);
        tree.reflow().unwrap();
        assert_eq!(tree.pending_fits(), 0);

        let svg_box = tree.measure_raw(svg).unwrap();
        assert_eq!((svg_box.width, svg_box.height), (300.0, 400.0));
        let figure_box = tree.measure_raw(figure).unwrap();
        assert_eq!(figure_box.height, 420.0);
        assert_eq!(figure_box.margin_bottom, 40.0);
        // Root shrinks by the graphic and grows by the widened margin.
        assert_eq!(tree.measure_raw(tree.root()).unwrap().height, 1000.0 - 400.0 + 24.0);
    }

    #[test]
    fn transform_strategy_compensates_with_margin() {
        let mut tree = RenderedTree::new();
        let root = tree.root();
        let svg = tree.append(root, ElementKind::Svg, RawBoxModel::border_box(600.0, 800.0));
        let d = FitDirectives::new(Size::new(600.0, 800.0), 0.25, SizeStrategy::Transform, false, 24.0);
        tree.apply_fit(svg, svg, &d).unwrap();
        assert_eq!(tree.node(svg).unwrap().style("margin-bottom"), Some("-576.00px"));
        assert_eq!(tree.node(svg).unwrap().style("transform"), Some("scale(0.2500)"));

        tree.reflow().unwrap();
        let model = tree.measure_raw(svg).unwrap();
        assert_eq!(model.height, 800.0);
        assert_eq!(model.height + model.margin_bottom, 800.0 - 600.0 + 24.0);
    }
}
