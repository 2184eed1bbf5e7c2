//! In-memory rendered document tree.
//! This crate holds a document's structure after rendering, together with the
//! box model each node was laid out with. It implements the tree seams of
//! `pagefit-traits`, so the fitting engine can run against it directly, and it
//! can be loaded from (and written back to) a nested JSON form.

pub mod graphics;
pub mod node;
pub mod spec;
pub mod tree;

pub use graphics::GraphicPolicy;
pub use node::{ElementKind, Node};
pub use spec::TreeSpec;
pub use tree::RenderedTree;
