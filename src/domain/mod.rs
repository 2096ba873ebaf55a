//! Domain layer: the tree container and its node model
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod error;
pub mod iter;
pub mod node;
pub mod properties;

pub use arena::Tree;
pub use error::{ErrorKind, TreeError, TreeResult};
pub use iter::{Ancestors, Descendants};
pub use node::{Node, NodeId};
pub use properties::{is_reserved, IntoProperties, Properties, RESERVED_KEYS};
