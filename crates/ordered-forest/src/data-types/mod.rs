//! Generic set containers parameterised by a balancing engine.

pub mod set;

pub use set::{SetTreeOps, TreeSet};
