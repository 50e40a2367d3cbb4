//! Self-adjusting (splay) binary search tree.
//!
//! Nodes carry no balance metadata. Every operation finishes by rotating
//! the last node it touched up to the root, which gives amortized
//! logarithmic cost per access.

#[path = "SplaySet.rs"]
pub mod splay_set;
pub mod types;
pub mod util;

pub use splay_set::SplaySet;
pub use types::SplayNode;
pub use util::{splay, Step};
