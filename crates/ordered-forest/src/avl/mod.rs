//! Height-balanced binary search tree.

#[path = "AvlSet.rs"]
pub mod avl_set;
pub mod types;
pub mod util;

pub use avl_set::{AvlOps, AvlSet};
pub use types::{AvlNode, AvlNodeLike};
