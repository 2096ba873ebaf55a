//! Borrowing traversal iterators over a [`Tree`].

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::Tree;
use crate::domain::node::Node;

/// Depth-first pre-order iterator over a subtree.
///
/// Yields a node before any of its descendants and siblings in insertion
/// order, the same order [`Tree::climb_up_from`] visits them.
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<Index>,
}

impl<'a> Descendants<'a> {
    #[instrument(level = "trace", skip(tree))]
    pub(crate) fn new(tree: &'a Tree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.tree.slot(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            if let Some(child_idx) = self.tree.index_of(*child) {
                self.stack.push(child_idx);
            }
        }
        Some(node)
    }
}

/// Root-ward iterator: the start node, its parent, ..., the root.
pub struct Ancestors<'a> {
    tree: &'a Tree,
    current: Option<Index>,
}

impl<'a> Ancestors<'a> {
    #[instrument(level = "trace", skip(tree))]
    pub(crate) fn new(tree: &'a Tree, start: Index) -> Self {
        Self {
            tree,
            current: Some(start),
        }
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.slot(self.current?)?;
        self.current = node.parent_id.and_then(|p| self.tree.index_of(p));
        Some(node)
    }
}
