//! Color-balanced (red-black) binary search tree.

#[path = "RbSet.rs"]
pub mod rb_set;
pub mod types;
pub mod util;

pub use rb_set::{RbOps, RbSet};
pub use types::{Color, RbNode, RbNodeLike};
pub use util::DeleteCase;
