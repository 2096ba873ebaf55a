use std::collections::HashMap;

use generational_arena::{Arena, Index};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::iter::{Ancestors, Descendants};
use crate::domain::node::{Node, NodeId};
use crate::domain::properties::{IntoProperties, Properties};

/// Arena-based tree with sequential node ids and per-node properties.
///
/// Nodes live in a generational arena; children are kept as ordered id lists
/// and `parent_id` is a plain back-reference. An `id -> Index` map is kept in
/// step with every insertion and deletion, so lookups by id are O(1) and
/// freeing a subtree never recurses.
///
/// ```
/// use proptree::{NodeId, Tree};
/// use serde_json::json;
///
/// let mut tree = Tree::new();
/// let a = tree.add(NodeId::ROOT, json!({"name": "a"})).unwrap();
/// let b = tree.add(a, ()).unwrap();
/// assert_eq!((a.get(), b.get()), (1, 2));
///
/// let mut path = Vec::new();
/// tree.climb_down_to_root(b, |node| path.push(node.id().get())).unwrap();
/// assert_eq!(path, vec![2, 1, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    /// Arena storage for all live nodes
    arena: Arena<Node>,
    /// Arena slot of every live node id
    index: HashMap<NodeId, Index>,
    /// Slot of the root node, never freed
    root: Index,
    /// Id handed out by the next `add`
    next_id: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only a root without properties.
    pub fn new() -> Self {
        Self::fresh(Properties::new())
    }

    /// Creates a tree whose root carries `properties`.
    pub fn with_properties(properties: impl IntoProperties) -> TreeResult<Self> {
        Ok(Self::fresh(properties.into_properties()?))
    }

    fn fresh(properties: Properties) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node::new(NodeId::ROOT, None, properties));
        let mut index = HashMap::new();
        index.insert(NodeId::ROOT, root);
        Self {
            arena,
            index,
            root,
            next_id: NodeId::ROOT.next(),
        }
    }

    /// Resets the tree to a single root carrying `properties`.
    ///
    /// All existing nodes are discarded and id allocation restarts, so the
    /// next `add` returns id 1. On error the tree is left unchanged.
    #[instrument(level = "debug", skip(self, properties))]
    pub fn initialize(&mut self, properties: impl IntoProperties) -> TreeResult<()> {
        let properties = properties.into_properties()?;
        let discarded = self.arena.len();
        *self = Self::fresh(properties);
        debug!(discarded, "tree re-initialized");
        Ok(())
    }

    fn make_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Appends a new node as the last child of `parent_id` and returns its id.
    #[instrument(level = "debug", skip(self, properties))]
    pub fn add(&mut self, parent_id: NodeId, properties: impl IntoProperties) -> TreeResult<NodeId> {
        let parent_idx = self.lookup(parent_id)?;
        let properties = properties.into_properties()?;

        let id = self.make_id();
        let node_idx = self.arena.insert(Node::new(id, Some(parent_id), properties));
        self.index.insert(id, node_idx);
        if let Some(parent) = self.arena.get_mut(parent_idx) {
            parent.children.push(id);
        }
        debug!(%id, %parent_id, "node added");
        Ok(id)
    }

    /// Removes `id` and its entire subtree.
    ///
    /// The root cannot be deleted. Remaining siblings keep their order.
    #[instrument(level = "debug", skip(self))]
    pub fn del(&mut self, id: NodeId) -> TreeResult<()> {
        if id.is_root() {
            return Err(TreeError::InvalidOperation(
                "you cannot delete the root".to_string(),
            ));
        }
        let node_idx = self.lookup(id)?;
        let parent_idx = self.parent_index(id)?;

        if let Some(parent) = self.arena.get_mut(parent_idx) {
            if let Some(pos) = parent.children.iter().position(|child| *child == id) {
                parent.children.remove(pos);
            }
        }

        let mut removed = 0usize;
        let mut stack = vec![node_idx];
        while let Some(idx) = stack.pop() {
            if let Some(node) = self.arena.remove(idx) {
                self.index.remove(&node.id);
                removed += 1;
                stack.extend(
                    node.children
                        .iter()
                        .filter_map(|child| self.index.get(child).copied()),
                );
            }
        }
        debug!(%id, removed, "subtree deleted");
        Ok(())
    }

    /// Merges `properties` onto the node: existing keys are overwritten,
    /// new keys are added, others stay untouched.
    #[instrument(level = "debug", skip(self, properties))]
    pub fn set(&mut self, id: NodeId, properties: impl IntoProperties) -> TreeResult<()> {
        let idx = self.lookup(id)?;
        let properties = properties.into_properties()?;
        if let Some(node) = self.arena.get_mut(idx) {
            node.properties.merge(properties);
        }
        Ok(())
    }

    /// Value of property `key` on node `id`; `Ok(None)` if the key is unset.
    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, id: NodeId, key: &str) -> TreeResult<Option<&Value>> {
        Ok(self.node(id)?.properties.get(key))
    }

    /// Depth-first pre-order walk of the subtree at `start` (root if `None`).
    ///
    /// `visit` sees each node before its descendants and siblings in the order
    /// they were added. It may change the visited node's properties.
    #[instrument(level = "debug", skip(self, visit))]
    pub fn climb_up_from<F>(&mut self, start: Option<NodeId>, mut visit: F) -> TreeResult<()>
    where
        F: FnMut(&mut Node),
    {
        let start_idx = match start {
            Some(id) => self.lookup(id)?,
            None => self.root,
        };

        let mut stack = vec![start_idx];
        while let Some(idx) = stack.pop() {
            let Some(node) = self.arena.get_mut(idx) else {
                continue;
            };
            visit(node);
            for child in node.children.iter().rev() {
                if let Some(child_idx) = self.index.get(child) {
                    stack.push(*child_idx);
                }
            }
        }
        Ok(())
    }

    /// Visits `id`, then each ancestor in turn, ending with the root.
    #[instrument(level = "debug", skip(self, visit))]
    pub fn climb_down_to_root<F>(&mut self, id: NodeId, mut visit: F) -> TreeResult<()>
    where
        F: FnMut(&mut Node),
    {
        let mut current = Some(self.lookup(id)?);
        while let Some(idx) = current {
            let Some(node) = self.arena.get_mut(idx) else {
                break;
            };
            visit(node);
            current = node
                .parent_id
                .and_then(|parent_id| self.index.get(&parent_id).copied());
        }
        Ok(())
    }

    pub fn root(&self) -> &Node {
        // root slot is never freed
        &self.arena[self.root]
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node(&self, id: NodeId) -> TreeResult<&Node> {
        self.index
            .get(&id)
            .and_then(|idx| self.arena.get(*idx))
            .ok_or(TreeError::NotFound(id))
    }

    /// Mutable access to a node; only its properties can be changed.
    #[instrument(level = "trace", skip(self))]
    pub fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node> {
        let idx = self.lookup(id)?;
        self.arena.get_mut(idx).ok_or(TreeError::NotFound(id))
    }

    /// The node owning `id`.
    #[instrument(level = "trace", skip(self))]
    pub fn parent(&self, id: NodeId) -> TreeResult<&Node> {
        let idx = self.parent_index(id)?;
        self.arena
            .get(idx)
            .ok_or_else(|| TreeError::InvalidOperation(format!("dangling parent of node {}", id)))
    }

    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Always false: the root cannot be removed. Kept next to [`Tree::len`]
    /// for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// The id the next successful `add` will return.
    pub fn next_id(&self) -> NodeId {
        self.next_id
    }

    /// Pre-order iterator over the whole tree.
    pub fn iter(&self) -> Descendants<'_> {
        Descendants::new(self, self.root)
    }

    /// Pre-order iterator over the subtree rooted at `id`.
    pub fn descendants(&self, id: NodeId) -> TreeResult<Descendants<'_>> {
        Ok(Descendants::new(self, self.lookup(id)?))
    }

    /// Iterator from `id` up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> TreeResult<Ancestors<'_>> {
        Ok(Ancestors::new(self, self.lookup(id)?))
    }

    /// Number of levels in the tree; a lone root has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1usize)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.arena.get(idx) {
                stack.extend(
                    node.children
                        .iter()
                        .filter_map(|child| self.index.get(child))
                        .map(|child_idx| (*child_idx, depth + 1)),
                );
            }
        }
        max_depth
    }

    /// Ids of all nodes without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_ids(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|node| node.is_leaf())
            .map(Node::id)
            .collect()
    }

    fn lookup(&self, id: NodeId) -> TreeResult<Index> {
        self.index_of(id).ok_or(TreeError::NotFound(id))
    }

    fn parent_index(&self, id: NodeId) -> TreeResult<Index> {
        let parent_id = self
            .node(id)?
            .parent_id
            .ok_or_else(|| TreeError::InvalidOperation("the root has no parent".to_string()))?;
        self.lookup(parent_id)
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Option<Index> {
        self.index.get(&id).copied()
    }

    pub(crate) fn slot(&self, idx: Index) -> Option<&Node> {
        self.arena.get(idx)
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Node;
    type IntoIter = Descendants<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
