//! Nested serde form of a rendered tree.
//!
//! ```json
//! { "tag": "body", "box": { "height": 1200 }, "children": [
//!     { "tag": "h2", "id": "setup", "box": { "height": 40, "marginBottom": 12 } },
//!     { "tag": "figure", "children": [ { "tag": "img", "src": "out/diagram-1.svg" } ] }
//! ] }
//! ```

use crate::node::ElementKind;
use crate::tree::RenderedTree;
use pagefit_traits::MetricsProvider;
use pagefit_types::{NodeId, RawBoxModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSpec {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// The measured box; absent means the node cannot be measured.
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub box_model: Option<RawBoxModel>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSpec>,
}

impl TreeSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_box(mut self, model: RawBoxModel) -> Self {
        self.box_model = Some(model);
        self
    }

    pub fn with_child(mut self, child: TreeSpec) -> Self {
        self.children.push(child);
        self
    }

    fn kind(&self) -> ElementKind {
        ElementKind::from_tag(
            &self.tag,
            self.class.as_deref(),
            self.src.as_deref(),
            self.level,
        )
    }
}

impl RenderedTree {
    /// Builds a tree whose root is `spec`.
    pub fn from_spec(spec: &TreeSpec) -> Self {
        let mut tree = RenderedTree::with_root(spec.kind());
        let root = tree.root();
        tree.fill_node(root, spec);
        let mut stack: Vec<(NodeId, &TreeSpec)> =
            spec.children.iter().rev().map(|c| (root, c)).collect();
        while let Some((parent, child)) = stack.pop() {
            let id = tree.append_unmeasured(parent, child.kind());
            tree.fill_node(id, child);
            stack.extend(child.children.iter().rev().map(|c| (id, c)));
        }
        tree
    }

    fn fill_node(&mut self, id: NodeId, spec: &TreeSpec) {
        if let Some(model) = spec.box_model {
            self.set_box(id, model);
        }
        if let Some(node) = self.node_mut(id) {
            node.dom_id = spec.id.clone();
            node.attributes = spec.attributes.clone();
            node.styles = spec.style.clone();
            if let Some(class) = &spec.class {
                if !matches!(node.kind, ElementKind::Block { .. }) {
                    node.attributes.insert("class".to_string(), class.clone());
                }
            }
        }
    }

    /// Writes the current state of the tree (attached nodes only) back to the
    /// nested form, including directives and their measurements.
    pub fn to_spec(&self) -> TreeSpec {
        self.spec_of(self.root())
    }

    fn spec_of(&self, id: NodeId) -> TreeSpec {
        let Some(node) = self.node(id) else {
            return TreeSpec::default();
        };
        let mut attributes = node.attributes.clone();
        let class = node.class().map(str::to_string);
        attributes.remove("class");
        TreeSpec {
            tag: node.kind.tag(),
            id: node.dom_id.clone(),
            class,
            src: match &node.kind {
                ElementKind::Image { src } => Some(src.clone()),
                _ => None,
            },
            level: None,
            box_model: self.measure_raw(id),
            attributes,
            style: node.styles.clone(),
            children: node.children().iter().map(|c| self.spec_of(*c)).collect(),
        }
    }
}
