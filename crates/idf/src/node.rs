use pagefit_types::NodeId;
use std::collections::BTreeMap;

/// The kind of element a node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// A heading, with its level (1 = h1).
    Heading(u8),
    Paragraph,
    /// An inline vector graphic.
    Svg,
    /// An embedded raster.
    Image { src: String },
    /// A figure wrapper.
    Figure,
    /// A generic block container.
    Block { class: Option<String> },
    /// Anything else, by tag name.
    Other(String),
}

impl ElementKind {
    /// Maps an HTML-like tag to an element kind.
    ///
    /// `h1`..`h6` become headings; `level` overrides the level implied by the
    /// tag and turns a `heading` tag into a heading.
    pub fn from_tag(tag: &str, class: Option<&str>, src: Option<&str>, level: Option<u8>) -> Self {
        let tag = tag.to_ascii_lowercase();
        let implied_level = match tag.as_bytes() {
            [b'h', digit @ b'1'..=b'6'] => Some(digit - b'0'),
            _ => None,
        };
        if let Some(level) = level.filter(|l| (1..=6).contains(l)).or(implied_level) {
            if implied_level.is_some() || tag == "heading" {
                return ElementKind::Heading(level);
            }
        }
        match tag.as_str() {
            "p" => ElementKind::Paragraph,
            "svg" => ElementKind::Svg,
            "img" => ElementKind::Image {
                src: src.unwrap_or_default().to_string(),
            },
            "figure" => ElementKind::Figure,
            "div" | "section" | "block" => ElementKind::Block {
                class: class.map(str::to_string),
            },
            _ => ElementKind::Other(tag),
        }
    }

    pub fn tag(&self) -> String {
        match self {
            ElementKind::Heading(level) => format!("h{}", level),
            ElementKind::Paragraph => "p".to_string(),
            ElementKind::Svg => "svg".to_string(),
            ElementKind::Image { .. } => "img".to_string(),
            ElementKind::Figure => "figure".to_string(),
            ElementKind::Block { .. } => "div".to_string(),
            ElementKind::Other(tag) => tag.clone(),
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            ElementKind::Heading(level) => Some(*level),
            _ => None,
        }
    }

    /// Kinds that may wrap a graphic.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, ElementKind::Figure | ElementKind::Block { .. })
    }
}

/// One element of a rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: ElementKind,
    pub dom_id: Option<String>,
    pub attributes: BTreeMap<String, String>,
    /// Inline style declarations written to the node.
    pub styles: BTreeMap<String, String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: ElementKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            dom_id: None,
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    pub fn class(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Block { class } => class.as_deref(),
            _ => self.attribute("class"),
        }
    }

    /// Label such as `h2#setup`, `div.diagram` or `svg`.
    pub fn label(&self) -> String {
        let tag = self.kind.tag();
        match (&self.dom_id, self.class()) {
            (Some(id), _) => format!("{}#{}", tag, id),
            (None, Some(class)) => format!("{}.{}", tag, class),
            (None, None) => tag,
        }
    }
}
