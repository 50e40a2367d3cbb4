use std::fmt::Debug;

use crate::data_types::{SetTreeOps, TreeSet};
use crate::types::{Compare, NaturalOrder};

use super::types::{Color, RbNode};
use super::util;

pub struct RbOps;

impl<K> SetTreeOps<K, RbNode<K>> for RbOps {
    const NAME: &'static str = "RB Tree";

    fn new_node(key: K) -> RbNode<K> {
        RbNode::new(key)
    }

    fn new_root(key: K) -> RbNode<K> {
        let mut node = RbNode::new(key);
        node.c = Color::Black;
        node
    }

    fn insert(arena: &mut [RbNode<K>], root: u32, node: u32, parent: u32, left: bool) -> u32 {
        util::insert(arena, root, node, parent, left)
    }

    fn remove(arena: &mut Vec<RbNode<K>>, root: u32, node: u32) -> Option<u32> {
        util::remove(arena, root, node)
    }

    fn assert_valid<C: Compare<K>>(
        arena: &[RbNode<K>],
        root: Option<u32>,
        comparator: &C,
    ) -> Result<(), String> {
        util::assert_red_black_tree(arena, root, comparator)
    }

    fn print(arena: &[RbNode<K>], root: Option<u32>) -> String
    where
        K: Debug,
    {
        util::print(arena, root)
    }
}

/// Ordered set backed by a red-black binary search tree.
///
/// Nodes are colored red or black. No red node has a red child and every
/// root-to-leaf path crosses the same number of black nodes, which keeps the
/// depth within twice the optimum.
pub type RbSet<K, C = NaturalOrder> = TreeSet<K, RbNode<K>, RbOps, C>;

impl<K, C> TreeSet<K, RbNode<K>, RbOps, C>
where
    C: Compare<K>,
{
    /// Black nodes on any root-to-leaf path; 0 when empty.
    pub fn black_height(&self) -> usize {
        util::black_height(self.arena(), self.root_index())
    }
}
