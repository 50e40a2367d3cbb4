//! Node and comparator trait definitions.
//!
//! Binary-tree nodes are stored in a [`Vec`]-backed arena owned by the set.
//! Each "pointer" is an `Option<u32>` index into that arena, and every
//! tree-manipulation function takes the arena plus node indices.

use std::cmp::Ordering;

/// Binary-tree links (`p`, `l`, `r`).
///
/// `p` is a back-link only. Nodes are owned by the arena, never by their
/// parent index.
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Node carrying a set key.
pub trait KeyNode<K>: Node {
    fn key(&self) -> &K;
    fn key_mut(&mut self) -> &mut K;
}

/// Strict weak ordering over keys.
///
/// Two keys are equivalent iff neither is [`less`](Compare::less) than the
/// other. Any `Fn(&K, &K) -> bool` closure is a comparator.
pub trait Compare<K> {
    fn less(&self, a: &K, b: &K) -> bool;

    fn cmp(&self, a: &K, b: &K) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl<K, F> Compare<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// Ascending order via [`PartialOrd`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: PartialOrd> Compare<K> for NaturalOrder {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}
