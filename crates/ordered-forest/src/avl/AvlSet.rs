use std::fmt::Debug;

use crate::data_types::{SetTreeOps, TreeSet};
use crate::types::{Compare, NaturalOrder};

use super::types::{AvlNode, AvlNodeLike};
use super::util;

pub struct AvlOps;

impl<K> SetTreeOps<K, AvlNode<K>> for AvlOps {
    const NAME: &'static str = "AVL Tree";

    fn new_node(key: K) -> AvlNode<K> {
        AvlNode::new(key)
    }

    fn insert(arena: &mut [AvlNode<K>], root: u32, node: u32, parent: u32, left: bool) -> u32 {
        util::insert(arena, root, node, parent, left)
    }

    fn remove(arena: &mut Vec<AvlNode<K>>, root: u32, node: u32) -> Option<u32> {
        util::remove(arena, root, node)
    }

    fn assert_valid<C: Compare<K>>(
        arena: &[AvlNode<K>],
        root: Option<u32>,
        comparator: &C,
    ) -> Result<(), String> {
        util::assert_avl_tree(arena, root, comparator)
    }

    fn print(arena: &[AvlNode<K>], root: Option<u32>) -> String
    where
        K: Debug,
    {
        util::print(arena, root)
    }
}

/// Ordered set backed by a height-balanced (AVL) binary search tree.
///
/// Every node stores the height of its subtree. After each insertion or
/// deletion the ancestors of the touched node are rebalanced with single or
/// double rotations, so sibling subtree heights never differ by more than 1.
pub type AvlSet<K, C = NaturalOrder> = TreeSet<K, AvlNode<K>, AvlOps, C>;

impl<K, C> TreeSet<K, AvlNode<K>, AvlOps, C>
where
    C: Compare<K>,
{
    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> usize {
        self.root_index()
            .map_or(0, |r| self.arena()[r as usize].h() as usize)
    }
}
