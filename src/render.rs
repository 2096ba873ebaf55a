//! Textual renderings of a tree for debugging and tests.
//!
//! The canonical JSON form lists the structural keys `id`, `parentId` and
//! `children` first, in that order, followed by the user properties in their
//! insertion order. Both renderings walk the tree with an explicit stack, so
//! the depth of a chain is bounded by memory, not by the call stack.

use std::io;
use std::string::FromUtf8Error;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};
use termtree::Tree as TermTree;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::RenderSettings;
use crate::domain::{Node, NodeId, Tree, TreeError};

/// Errors raised while rendering. Only [`RenderError::Tree`] is reachable for
/// well-formed trees; the others come from the output writer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("serialize property value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("write rendered output: {0}")]
    Io(#[from] io::Error),

    #[error("rendered output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

enum Step<'a> {
    /// `position` is `Some(first)` for nodes inside a `children` array.
    Enter {
        node: &'a Node,
        position: Option<bool>,
    },
    Exit {
        node: &'a Node,
        nested: bool,
    },
}

fn live_children<'a>(tree: &'a Tree, node: &'a Node) -> Vec<&'a Node> {
    node.children()
        .iter()
        .filter_map(|child| tree.node(*child).ok())
        .collect()
}

/// Drives a serde_json formatter by hand, so that nesting lives on the heap.
struct JsonWriter<F> {
    out: Vec<u8>,
    formatter: F,
}

impl<F: Formatter + Clone> JsonWriter<F> {
    fn new(formatter: F) -> Self {
        Self {
            out: Vec::new(),
            formatter,
        }
    }

    /// Serializes a self-contained value at the current indentation.
    fn embed<T: Serialize + ?Sized>(&mut self, value: &T) -> RenderResult<()> {
        let mut serializer = Serializer::with_formatter(&mut self.out, self.formatter.clone());
        value.serialize(&mut serializer)?;
        Ok(())
    }

    fn key(&mut self, key: &str, first: bool) -> RenderResult<()> {
        self.formatter.begin_object_key(&mut self.out, first)?;
        self.embed(key)?;
        self.formatter.end_object_key(&mut self.out)?;
        self.formatter.begin_object_value(&mut self.out)?;
        Ok(())
    }

    fn id_value(&mut self, id: Option<NodeId>) -> RenderResult<()> {
        match id {
            Some(id) => self.formatter.write_u64(&mut self.out, id.get())?,
            None => self.formatter.write_null(&mut self.out)?,
        }
        self.formatter.end_object_value(&mut self.out)?;
        Ok(())
    }

    fn open_node(&mut self, node: &Node) -> RenderResult<()> {
        self.formatter.begin_object(&mut self.out)?;
        self.key("id", true)?;
        self.id_value(Some(node.id()))?;
        self.key("parentId", false)?;
        self.id_value(node.parent_id())?;
        self.key("children", false)?;
        self.formatter.begin_array(&mut self.out)?;
        Ok(())
    }

    fn close_node(&mut self, node: &Node) -> RenderResult<()> {
        self.formatter.end_array(&mut self.out)?;
        self.formatter.end_object_value(&mut self.out)?;
        for (key, value) in node.properties().iter() {
            self.key(key, false)?;
            self.embed(value)?;
            self.formatter.end_object_value(&mut self.out)?;
        }
        self.formatter.end_object(&mut self.out)?;
        Ok(())
    }

    fn write_subtree(mut self, tree: &Tree, id: NodeId) -> RenderResult<String> {
        let mut stack = vec![Step::Enter {
            node: tree.node(id)?,
            position: None,
        }];

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter { node, position } => {
                    if let Some(first) = position {
                        self.formatter.begin_array_value(&mut self.out, first)?;
                    }
                    self.open_node(node)?;
                    stack.push(Step::Exit {
                        node,
                        nested: position.is_some(),
                    });
                    for (i, child) in live_children(tree, node).into_iter().enumerate().rev() {
                        stack.push(Step::Enter {
                            node: child,
                            position: Some(i == 0),
                        });
                    }
                }
                Step::Exit { node, nested } => {
                    self.close_node(node)?;
                    if nested {
                        self.formatter.end_array_value(&mut self.out)?;
                    }
                }
            }
        }

        Ok(String::from_utf8(self.out)?)
    }
}

/// Canonical JSON of the subtree rooted at `id`.
#[instrument(level = "debug", skip(tree))]
pub fn to_canonical_json(tree: &Tree, id: NodeId, pretty: bool) -> RenderResult<String> {
    if pretty {
        JsonWriter::new(PrettyFormatter::new()).write_subtree(tree, id)
    } else {
        JsonWriter::new(CompactFormatter).write_subtree(tree, id)
    }
}

/// Canonical JSON of the whole tree using the configured formatting.
pub fn tree_to_json(tree: &Tree, settings: &RenderSettings) -> RenderResult<String> {
    to_canonical_json(tree, NodeId::ROOT, settings.pretty)
}

fn node_label(node: &Node, settings: &RenderSettings) -> String {
    let mut label = format!("#{}", node.id());
    if let Some(value) = node.get(&settings.label_key) {
        match value.as_str() {
            Some(text) => label.push_str(&format!(" {}", text)),
            None => label.push_str(&format!(" {}", value)),
        }
    }
    if settings.show_properties {
        let rest: Vec<String> = node
            .properties()
            .iter()
            .filter(|(key, _)| *key != settings.label_key)
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        if !rest.is_empty() {
            label.push_str(&format!(" [{}]", rest.join(", ")));
        }
    }
    label
}


pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> TermTree<String> {
        self.to_tree_string_with(&RenderSettings::default())
    }

    /// Nodes deeper than `settings.max_depth` are folded into a single
    /// `… N more` leaf under their last drawn ancestor.
    fn to_tree_string_with(&self, settings: &RenderSettings) -> TermTree<String>;
}

enum Frame<'a> {
    Enter(&'a Node, usize),
    Exit(&'a Node, usize),
}

impl TreeNodeConvert for Tree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string_with(&self, settings: &RenderSettings) -> TermTree<String> {
        let max_depth = settings.max_depth.max(1);
        let mut stack = vec![Frame::Enter(self.root(), 1)];
        // finished subtrees, children in sibling order at the top
        let mut built: Vec<TermTree<String>> = Vec::new();

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(node, depth) => {
                    let children = live_children(self, node);
                    let label = node_label(node, settings);
                    if children.is_empty() {
                        built.push(TermTree::new(label));
                    } else if depth >= max_depth {
                        let hidden = self
                            .descendants(node.id())
                            .map(|nodes| nodes.count().saturating_sub(1))
                            .unwrap_or_default();
                        debug!(id = %node.id(), hidden, "folding deep subtree");
                        built.push(
                            TermTree::new(label)
                                .with_leaves([TermTree::new(format!("… {} more", hidden))]),
                        );
                    } else {
                        stack.push(Frame::Exit(node, children.len()));
                        for child in children.into_iter().rev() {
                            stack.push(Frame::Enter(child, depth + 1));
                        }
                    }
                }
                Frame::Exit(node, count) => {
                    let leaves = built.split_off(built.len().saturating_sub(count));
                    built.push(TermTree::new(node_label(node, settings)).with_leaves(leaves));
                }
            }
        }

        built
            .pop()
            .unwrap_or_else(|| TermTree::new(node_label(self.root(), settings)))
    }
}
