//! Multiway (B-tree) search tree with a runtime minimum degree.
//!
//! With minimum degree `t` every node except the root holds between
//! `t - 1` and `2t - 1` keys and all leaves sit at the same depth.
//! Insertion splits full nodes on the way down and deletion tops up
//! minimal nodes on the way down, so neither ever walks back up.

#[path = "BTreeSet.rs"]
pub mod btree_set;
pub mod types;

pub use btree_set::BTreeSet;
pub use types::{BNode, Degree, DEFAULT_DEGREE};
