//! Node identity and the node record stored in the arena.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::properties::Properties;

/// Identifier of a node, unique within one tree epoch.
///
/// Ids are handed out sequentially starting at [`NodeId::ROOT`] and are never
/// reused, even after the node has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// The root node always has id 0
    pub const ROOT: NodeId = NodeId(0);

    pub const fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_root(self) -> bool {
        self.0 == 0
    }

    pub(crate) const fn next(self) -> Self {
        NodeId(self.0 + 1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Tree node in the arena-based hierarchy structure.
///
/// The structural fields are only writable by the owning [`Tree`](crate::Tree);
/// callers (including traversal visitors) can read them and mutate the
/// property bag.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) properties: Properties,
}

impl Node {
    pub(crate) fn new(id: NodeId, parent_id: Option<NodeId>, properties: Properties) -> Self {
        Self {
            id,
            parent_id,
            children: Vec::new(),
            properties,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Id of the owning node, `None` for the root
    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    /// Child ids in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}
