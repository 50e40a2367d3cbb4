//! Ordered sets of unique keys over four interchangeable balancing engines.
//!
//! Every engine implements [`OrderedSet`] and answers `find` / `add` /
//! `remove` / `clear` identically; they differ only in shape and cost.
//!
//! Nodes live in a per-set `Vec` arena and refer to each other through
//! `Option<u32>` indices. Parent indices are back-links only, so teardown
//! and deep copies are flat vector operations regardless of tree depth.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | [`Node`], [`KeyNode`] link traits, [`Compare`], [`NaturalOrder`] |
//! | [`util`] | Arena traversal, rotations, descent, slot reclamation |
//! | [`print`] | Box-drawing tree dumps |
//! | [`data_types`] | [`TreeSet`] core shared by AVL and red-black sets |
//! | [`avl`] | [`AvlSet`], height-balanced |
//! | [`red_black`] | [`RbSet`], color-balanced |
//! | [`splay`] | [`SplaySet`], self-adjusting |
//! | [`btree`] | [`BTreeSet`], multiway with a runtime minimum degree |
//! | [`set`] | [`OrderedSet`] contract |
//! | [`error`] | [`ConfigError`] |
//!
//! ```
//! use ordered_forest::{AvlSet, BTreeSet, OrderedSet, SplaySet};
//!
//! let mut sets: Vec<Box<dyn OrderedSet<i32>>> = vec![
//!     Box::new(AvlSet::<i32>::new()),
//!     Box::new(SplaySet::<i32>::new()),
//!     Box::new(BTreeSet::<i32>::with_degree(2).unwrap()),
//! ];
//! for set in &mut sets {
//!     assert!(set.add(3));
//!     assert!(!set.add(3));
//!     assert!(set.find(&3));
//!     assert!(set.remove(&3));
//!     assert!(set.is_empty());
//! }
//! ```

pub mod avl;
pub mod btree;
#[path = "data-types/mod.rs"]
pub mod data_types;
pub mod error;
pub mod print;
#[path = "red-black/mod.rs"]
pub mod red_black;
pub mod set;
pub mod splay;
pub mod types;
pub mod util;

pub use avl::AvlSet;
pub use btree::{BTreeSet, Degree, DEFAULT_DEGREE};
pub use data_types::TreeSet;
pub use error::ConfigError;
pub use red_black::RbSet;
pub use set::OrderedSet;
pub use splay::SplaySet;
pub use types::{Compare, KeyNode, NaturalOrder, Node};
