//! # apiforge outline
//!
//! Projects a specification document into one uniform navigation tree,
//! whatever its dialect, and defines the [`Selection`] a tree node focuses.
//!
//! ```rust,ignore
//! use apiforge_outline::{build_tree, find_node};
//!
//! let tree = build_tree(&document);
//! let get = find_node(&tree, "path-/pets-get").unwrap();
//! assert_eq!(get.label, "GET: listPets");
//! ```

mod builder;
mod ids;
mod node;
mod selection;

pub use builder::build_tree;
pub use node::{find_node, flatten, NodeKind, TreeNode};
pub use selection::Selection;
