//! Mutable in-memory tree with sequential integer node ids.
//!
//! Every node carries an insertion-ordered bag of JSON properties next to its
//! structural fields (`id`, `parentId`, `children`). The tree supports adding
//! nodes under any parent, deleting whole subtrees, merging properties, and
//! two walks: pre-order from a node through its descendants
//! ([`Tree::climb_up_from`]) and from a node up to the root
//! ([`Tree::climb_down_to_root`]).
//!
//! ```
//! use proptree::{NodeId, Tree};
//! use serde_json::json;
//!
//! let mut tree = Tree::with_properties(json!({"score": 1})).unwrap();
//! let first = tree.add(NodeId::ROOT, ()).unwrap();
//! let second = tree.add(NodeId::ROOT, ()).unwrap();
//! tree.add(first, ()).unwrap();
//!
//! tree.del(first).unwrap();
//! assert_eq!(tree.root().children(), &[second]);
//!
//! tree.set(NodeId::ROOT, json!({"score": 2})).unwrap();
//! assert_eq!(tree.get(NodeId::ROOT, "score").unwrap(), Some(&json!(2)));
//! ```

pub mod config;
pub mod domain;
pub mod render;
pub mod util;

pub use config::{RenderSettings, Settings, SettingsError, SettingsResult};
pub use domain::{
    Ancestors, Descendants, ErrorKind, IntoProperties, Node, NodeId, Properties, Tree, TreeError,
    TreeResult,
};
pub use render::{to_canonical_json, RenderError, RenderResult, TreeNodeConvert};
