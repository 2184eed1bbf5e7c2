//! Newtype wrapper for node identity inside a rendered document tree.
//!
//! Node ids are opaque handles handed out by the tree implementation. They are
//! ordered so that collections keyed by them iterate deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A handle to a node of a rendered document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a new NodeId from an arena index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index this id refers to
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
