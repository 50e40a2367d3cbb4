use std::borrow::Cow;
use std::fmt::{self, Debug};

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::print::{print_tree, PrintChild};
use crate::set::OrderedSet;
use crate::types::{Compare, NaturalOrder};

use super::types::{BNode, Degree};

/// Mutable references to two distinct slots.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (head, tail) = items.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

/// Ordered set backed by a B-tree of configurable minimum degree.
///
/// Nodes live in an arena; slots freed by merges and root collapses go to a
/// free list and are reused by later splits.
#[derive(Clone)]
pub struct BTreeSet<K, C = NaturalOrder> {
    nodes: Vec<BNode<K>>,
    free: Vec<u32>,
    root: Option<u32>,
    len: usize,
    degree: Degree,
    comparator: C,
}

impl<K: PartialOrd> BTreeSet<K> {
    /// Empty set with [`DEFAULT_DEGREE`](super::DEFAULT_DEGREE).
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    pub fn with_degree(t: usize) -> Result<Self, ConfigError> {
        Self::with_degree_and_comparator(t, NaturalOrder)
    }

    /// Set holding exactly `key`.
    pub fn single(key: K) -> Self {
        let mut set = Self::new();
        set.add(key);
        set
    }
}

impl<K: PartialOrd> Default for BTreeSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C: Compare<K>> BTreeSet<K, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_config(Degree::default(), comparator)
    }

    pub fn with_degree_and_comparator(t: usize, comparator: C) -> Result<Self, ConfigError> {
        Ok(Self::with_config(Degree::new(t)?, comparator))
    }

    pub fn with_config(degree: Degree, comparator: C) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
            degree,
            comparator,
        }
    }

    /// Minimum degree `t`.
    pub fn degree(&self) -> usize {
        self.degree.get()
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn root_index(&self) -> Option<u32> {
        self.root
    }

    pub fn node(&self, idx: u32) -> &BNode<K> {
        &self.nodes[idx as usize]
    }

    /// Levels from the root down to the leaves; 0 when empty.
    pub fn height(&self) -> usize {
        let mut levels = 0;
        let mut curr = self.root;
        while let Some(i) = curr {
            levels += 1;
            curr = self.nodes[i as usize].children.first().copied();
        }
        levels
    }

    #[inline]
    fn search(&self, node: u32, key: &K) -> Result<usize, usize> {
        self.nodes[node as usize]
            .keys
            .binary_search_by(|k| self.comparator.cmp(k, key))
    }

    fn alloc(&mut self, node: BNode<K>) -> u32 {
        match self.free.pop() {
            Some(i) => {
                self.nodes[i as usize] = node;
                i
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as u32
            }
        }
    }

    fn release(&mut self, idx: u32) -> BNode<K> {
        self.free.push(idx);
        std::mem::take(&mut self.nodes[idx as usize])
    }

    pub fn contains(&self, key: &K) -> bool {
        let mut curr = self.root;
        while let Some(i) = curr {
            match self.search(i, key) {
                Ok(_) => return true,
                Err(idx) => curr = self.nodes[i as usize].children.get(idx).copied(),
            }
        }
        false
    }

    pub fn find(&self, key: &K) -> bool {
        self.contains(key)
    }

    /// Moves the upper half of the full child `parent.children[idx]` into a
    /// new right sibling and lifts the median into `parent`.
    fn split_child(&mut self, parent: u32, idx: usize) {
        let t = self.degree.get();
        let child = self.nodes[parent as usize].children[idx];
        let node = &mut self.nodes[child as usize];
        debug_assert_eq!(node.keys.len(), self.degree.max_keys());

        let keys = node.keys.split_off(t);
        let median = node.keys.pop().expect("full node has a median");
        let children = if node.is_leaf() {
            Vec::new()
        } else {
            node.children.split_off(t)
        };
        let sibling = self.alloc(BNode { keys, children });

        let parent_node = &mut self.nodes[parent as usize];
        parent_node.keys.insert(idx, median);
        parent_node.children.insert(idx + 1, sibling);
        trace!(parent, child, sibling, "b-tree split");
    }

    pub fn add(&mut self, key: K) -> bool {
        if self.contains(&key) {
            return false;
        }
        let Some(mut node) = self.root else {
            self.root = Some(self.alloc(BNode::leaf(vec![key])));
            self.len = 1;
            return true;
        };

        if self.nodes[node as usize].keys.len() == self.degree.max_keys() {
            let old_root = node;
            node = self.alloc(BNode {
                keys: Vec::new(),
                children: vec![old_root],
            });
            self.root = Some(node);
            self.split_child(node, 0);
            trace!(old_root, new_root = node, "b-tree root grew");
        }

        loop {
            let mut idx = self.search(node, &key).unwrap_or_else(|i| i);
            if self.nodes[node as usize].is_leaf() {
                self.nodes[node as usize].keys.insert(idx, key);
                break;
            }
            let child = self.nodes[node as usize].children[idx];
            if self.nodes[child as usize].keys.len() == self.degree.max_keys() {
                self.split_child(node, idx);
                if self
                    .comparator
                    .less(&self.nodes[node as usize].keys[idx], &key)
                {
                    idx += 1;
                }
            }
            node = self.nodes[node as usize].children[idx];
        }

        self.len += 1;
        true
    }

    /// Rightmost leaf under `node`.
    fn last_leaf(&self, mut node: u32) -> u32 {
        while let Some(&c) = self.nodes[node as usize].children.last() {
            node = c;
        }
        node
    }

    /// Leftmost leaf under `node`.
    fn first_leaf(&self, mut node: u32) -> u32 {
        while let Some(&c) = self.nodes[node as usize].children.first() {
            node = c;
        }
        node
    }

    /// Moves the first key of `children[idx + 1]` up into `node` and the
    /// separator down to the end of `children[idx]`.
    fn borrow_from_right(&mut self, node: u32, idx: usize) {
        let left = self.nodes[node as usize].children[idx];
        let right = self.nodes[node as usize].children[idx + 1];

        let donor = &mut self.nodes[right as usize];
        let key = donor.keys.remove(0);
        let child = (!donor.is_leaf()).then(|| donor.children.remove(0));

        let sep = std::mem::replace(&mut self.nodes[node as usize].keys[idx], key);
        let target = &mut self.nodes[left as usize];
        target.keys.push(sep);
        target.children.extend(child);
        trace!(node, from = right, to = left, "b-tree borrow from right");
    }

    /// Moves the last key of `children[idx - 1]` up into `node` and the
    /// separator down to the front of `children[idx]`.
    fn borrow_from_left(&mut self, node: u32, idx: usize) {
        let left = self.nodes[node as usize].children[idx - 1];
        let right = self.nodes[node as usize].children[idx];

        let donor = &mut self.nodes[left as usize];
        let key = donor.keys.pop().expect("donor holds spare keys");
        let child = if donor.is_leaf() {
            None
        } else {
            donor.children.pop()
        };

        let sep = std::mem::replace(&mut self.nodes[node as usize].keys[idx - 1], key);
        let target = &mut self.nodes[right as usize];
        target.keys.insert(0, sep);
        if let Some(c) = child {
            target.children.insert(0, c);
        }
        trace!(node, from = left, to = right, "b-tree borrow from left");
    }

    /// Folds `children[idx + 1]` and the separator `keys[idx]` into
    /// `children[idx]`, freeing the right node.
    fn merge_children(&mut self, node: u32, idx: usize) {
        let parent = &mut self.nodes[node as usize];
        let sep = parent.keys.remove(idx);
        let left = parent.children[idx];
        let right = parent.children.remove(idx + 1);

        let BNode { keys, children } = self.release(right);
        let target = &mut self.nodes[left as usize];
        target.keys.push(sep);
        target.keys.extend(keys);
        target.children.extend(children);
        debug_assert!(target.keys.len() <= self.degree.max_keys());
        trace!(node, left, right, "b-tree merge");
    }

    /// Makes sure `children[idx]` can lose a key and returns the child to
    /// descend into.
    fn fill_child(&mut self, node: u32, idx: usize) -> u32 {
        let t = self.degree.get();
        let parent = &self.nodes[node as usize];
        let child = parent.children[idx];
        if self.nodes[child as usize].keys.len() >= t {
            return child;
        }

        let has_right = idx < parent.keys.len();
        let right_rich =
            has_right && self.nodes[parent.children[idx + 1] as usize].keys.len() >= t;
        let left_rich = idx > 0 && self.nodes[parent.children[idx - 1] as usize].keys.len() >= t;

        if right_rich {
            self.borrow_from_right(node, idx);
            child
        } else if left_rich {
            self.borrow_from_left(node, idx);
            child
        } else if has_right {
            self.merge_children(node, idx);
            child
        } else {
            self.merge_children(node, idx - 1);
            self.nodes[node as usize].children[idx - 1]
        }
    }

    pub fn remove(&mut self, key: &K) -> bool {
        if !self.contains(key) {
            return false;
        }
        let root = self.root.expect("found key implies a root");
        let t = self.degree.get();

        let mut node = root;
        loop {
            let leaf = self.nodes[node as usize].is_leaf();
            match self.search(node, key) {
                Ok(idx) if leaf => {
                    self.nodes[node as usize].keys.remove(idx);
                    break;
                }
                Ok(idx) => {
                    let left = self.nodes[node as usize].children[idx];
                    let right = self.nodes[node as usize].children[idx + 1];
                    if self.nodes[left as usize].keys.len() >= t {
                        // The key sinks to the predecessor slot and stays the
                        // maximum of the left subtree, so the descent goes on.
                        let pred = self.last_leaf(left);
                        let (n, p) = pair_mut(&mut self.nodes, node as usize, pred as usize);
                        std::mem::swap(
                            &mut n.keys[idx],
                            p.keys.last_mut().expect("leaf holds keys"),
                        );
                        node = left;
                    } else if self.nodes[right as usize].keys.len() >= t {
                        let succ = self.first_leaf(right);
                        let (n, s) = pair_mut(&mut self.nodes, node as usize, succ as usize);
                        std::mem::swap(
                            &mut n.keys[idx],
                            s.keys.first_mut().expect("leaf holds keys"),
                        );
                        node = right;
                    } else {
                        self.merge_children(node, idx);
                        node = left;
                    }
                }
                Err(idx) => {
                    debug_assert!(!leaf, "present key must be reachable");
                    if leaf {
                        return false;
                    }
                    node = self.fill_child(node, idx);
                }
            }
        }
        self.len -= 1;

        let root_node = &self.nodes[root as usize];
        if root_node.keys.is_empty() {
            let next_root = root_node.children.first().copied();
            self.release(root);
            self.root = next_root;
            trace!(old_root = root, ?next_root, "b-tree root collapsed");
            if next_root.is_none() {
                self.nodes.clear();
                self.free.clear();
            }
        }
        true
    }

    pub fn clear(&mut self) {
        if self.len > 0 {
            debug!(engine = "B-Tree", len = self.len, "clearing set");
        }
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves the content out, leaving an empty set with the same degree and
    /// comparator.
    pub fn take(&mut self) -> Self
    where
        C: Clone,
    {
        Self {
            nodes: std::mem::take(&mut self.nodes),
            free: std::mem::take(&mut self.free),
            root: self.root.take(),
            len: std::mem::take(&mut self.len),
            degree: self.degree,
            comparator: self.comparator.clone(),
        }
    }

    /// Visits keys in ascending order with an explicit stack.
    pub fn for_each<G: FnMut(&K)>(&self, mut f: G) {
        // (node, next child to descend into)
        let mut stack: Vec<(u32, usize)> = Vec::new();
        if let Some(r) = self.root {
            stack.push((r, 0));
        }
        while let Some((i, pos)) = stack.pop() {
            let node = &self.nodes[i as usize];
            if node.is_leaf() {
                node.keys.iter().for_each(&mut f);
                continue;
            }
            if pos > 0 {
                f(&node.keys[pos - 1]);
            }
            if pos < node.keys.len() {
                stack.push((i, pos + 1));
            }
            stack.push((node.children[pos], 0));
        }
    }

    pub fn to_vec(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut out = Vec::with_capacity(self.len);
        self.for_each(|k| out.push(k.clone()));
        out
    }

    /// Checks occupancy, ordering, separator bounds, leaf depth and the key
    /// count without recursion.
    pub fn assert_valid(&self) -> Result<(), String> {
        let Some(root) = self.root else {
            return if self.len == 0 {
                Ok(())
            } else {
                Err(format!("Empty tree reports {} keys", self.len))
            };
        };

        let min = self.degree.min_keys();
        let max = self.degree.max_keys();
        let mut count = 0usize;
        let mut visited = 0usize;
        let mut leaf_depth: Option<usize> = None;
        // (node, depth, exclusive lower bound, exclusive upper bound)
        let mut stack: Vec<(u32, usize, Option<&K>, Option<&K>)> = vec![(root, 0, None, None)];

        while let Some((i, depth, lo, hi)) = stack.pop() {
            visited += 1;
            if visited > self.nodes.len() {
                return Err("Cycle in child links".to_string());
            }
            let node = &self.nodes[i as usize];
            let n = node.keys.len();

            if i == root {
                if n == 0 || n > max {
                    return Err(format!("Root holds {n} keys, expected 1..={max}"));
                }
            } else if n < min || n > max {
                return Err(format!("Node {i} holds {n} keys, expected {min}..={max}"));
            }

            for w in node.keys.windows(2) {
                if !self.comparator.less(&w[0], &w[1]) {
                    return Err(format!("Keys of node {i} are not strictly ascending"));
                }
            }
            if let (Some(lo), Some(first)) = (lo, node.keys.first()) {
                if !self.comparator.less(lo, first) {
                    return Err(format!("Node {i} breaks its lower separator"));
                }
            }
            if let (Some(hi), Some(last)) = (hi, node.keys.last()) {
                if !self.comparator.less(last, hi) {
                    return Err(format!("Node {i} breaks its upper separator"));
                }
            }
            count += n;

            if node.is_leaf() {
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(d) if d != depth => {
                        return Err(format!("Leaves at depths {d} and {depth}"));
                    }
                    Some(_) => {}
                }
                continue;
            }

            if node.children.len() != n + 1 {
                return Err(format!(
                    "Node {i} has {n} keys but {} children",
                    node.children.len()
                ));
            }
            for (c, &child) in node.children.iter().enumerate() {
                let child_lo = if c == 0 { lo } else { Some(&node.keys[c - 1]) };
                let child_hi = if c == n { hi } else { Some(&node.keys[c]) };
                stack.push((child, depth + 1, child_lo, child_hi));
            }
        }

        if count != self.len {
            return Err(format!(
                "Size mismatch: reachable {count}, recorded {}",
                self.len
            ));
        }
        if visited + self.free.len() != self.nodes.len() {
            return Err(format!(
                "Slot leak: {visited} live, {} free, {} total",
                self.free.len(),
                self.nodes.len()
            ));
        }
        Ok(())
    }

    fn print_node(&self, idx: u32, tab: &str) -> String
    where
        K: Debug,
    {
        let node = &self.nodes[idx as usize];
        let children: Vec<Box<PrintChild<'_>>> = node
            .children
            .iter()
            .map(|&c| Box::new(move |tab: &str| self.print_node(c, tab)) as Box<PrintChild<'_>>)
            .collect();
        let refs: Vec<Option<&PrintChild<'_>>> = children.iter().map(|c| Some(c.as_ref())).collect();
        format!("{:?}{}", node.keys, print_tree(tab, &refs))
    }

    /// Box-drawing dump, one line per node.
    pub fn dump(&self) -> String
    where
        K: Debug,
    {
        match self.root {
            Some(r) => self.print_node(r, ""),
            None => "∅".to_string(),
        }
    }
}

impl<K, C: Compare<K>> Extend<K> for BTreeSet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<K, C: Compare<K> + Default> FromIterator<K> for BTreeSet<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::with_comparator(C::default());
        set.extend(iter);
        set
    }
}

impl<K: Debug, C: Compare<K>> Debug for BTreeSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        self.for_each(|k| {
            set.entry(k);
        });
        set.finish()
    }
}

impl<K, C: Compare<K>> OrderedSet<K> for BTreeSet<K, C> {
    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(format!("B-Tree (N={})", self.degree.get()))
    }

    fn find(&mut self, key: &K) -> bool {
        self.contains(key)
    }

    fn add(&mut self, key: K) -> bool {
        BTreeSet::add(self, key)
    }

    fn remove(&mut self, key: &K) -> bool {
        BTreeSet::remove(self, key)
    }

    fn clear(&mut self) {
        BTreeSet::clear(self)
    }

    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn for_each(&self, f: &mut dyn FnMut(&K)) {
        BTreeSet::for_each(self, f)
    }

    fn assert_valid(&self) -> Result<(), String> {
        BTreeSet::assert_valid(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_of(set: &BTreeSet<i32>, idx: u32) -> Vec<i32> {
        set.node(idx).keys.clone()
    }

    #[test]
    fn split_promotes_median() {
        let mut set = BTreeSet::with_degree(2).unwrap();
        for k in [10, 20, 30] {
            set.add(k);
        }
        let root = set.root_index().unwrap();
        assert!(set.node(root).is_leaf());

        set.add(40);
        let root = set.root_index().unwrap();
        assert_eq!(keys_of(&set, root), vec![20]);
        let children = set.node(root).children.clone();
        assert_eq!(keys_of(&set, children[0]), vec![10]);
        assert_eq!(keys_of(&set, children[1]), vec![30, 40]);
        set.assert_valid().unwrap();
    }

    #[test]
    fn borrow_from_left_sibling() {
        let mut set = BTreeSet::with_degree(2).unwrap();
        // Root [30], children [10, 20] and [40].
        for k in [10, 30, 40, 20] {
            set.add(k);
        }
        let root = set.root_index().unwrap();
        assert_eq!(keys_of(&set, root), vec![30]);

        assert!(set.remove(&40));
        let root = set.root_index().unwrap();
        let children = set.node(root).children.clone();
        assert_eq!(keys_of(&set, root), vec![20]);
        assert_eq!(keys_of(&set, children[0]), vec![10]);
        assert_eq!(keys_of(&set, children[1]), vec![30]);
        set.assert_valid().unwrap();
    }

    #[test]
    fn borrow_from_right_sibling() {
        let mut set = BTreeSet::with_degree(2).unwrap();
        // Root [20], children [10] and [30, 40].
        for k in [10, 20, 30, 40] {
            set.add(k);
        }
        assert!(set.remove(&10));
        let root = set.root_index().unwrap();
        let children = set.node(root).children.clone();
        assert_eq!(keys_of(&set, root), vec![30]);
        assert_eq!(keys_of(&set, children[0]), vec![20]);
        assert_eq!(keys_of(&set, children[1]), vec![40]);
        set.assert_valid().unwrap();
    }

    #[test]
    fn merge_collapses_root_and_recycles_slots() {
        let mut set = BTreeSet::with_degree(2).unwrap();
        for k in [10, 20, 30, 40] {
            set.add(k);
        }
        assert!(set.remove(&40));
        assert_eq!(set.height(), 2);
        // Both children are minimal: the root key merges down.
        assert!(set.remove(&20));
        assert_eq!(set.height(), 1);
        let root = set.root_index().unwrap();
        assert_eq!(keys_of(&set, root), vec![10, 30]);
        set.assert_valid().unwrap();

        assert_eq!(set.free.len(), 2);
        set.add(50);
        set.add(60);
        assert_eq!(set.free.len(), 0);
        set.assert_valid().unwrap();
    }

    #[test]
    fn internal_key_uses_predecessor_then_successor() {
        let mut set = BTreeSet::with_degree(2).unwrap();
        for k in [10, 20, 30, 40, 5] {
            set.add(k);
        }
        // Root [20], children [5, 10] and [30, 40].
        assert!(set.remove(&20));
        let root = set.root_index().unwrap();
        assert_eq!(keys_of(&set, root), vec![10]);
        set.assert_valid().unwrap();

        // Left child [5] is minimal now, right child [30, 40] is not.
        assert!(set.remove(&10));
        let root = set.root_index().unwrap();
        assert_eq!(keys_of(&set, root), vec![30]);
        assert_eq!(set.to_vec(), vec![5, 30, 40]);
        set.assert_valid().unwrap();
    }

    #[test]
    fn removing_last_key_empties_arena() {
        let mut set = BTreeSet::with_degree(3).unwrap();
        set.add(1);
        assert!(set.remove(&1));
        assert!(set.is_empty());
        assert_eq!(set.root_index(), None);
        assert!(set.nodes.is_empty());
        set.assert_valid().unwrap();
    }

    #[test]
    fn validator_detects_bad_occupancy() {
        let mut set = BTreeSet::with_degree(2).unwrap();
        for k in [10, 20, 30, 40] {
            set.add(k);
        }
        let root = set.root_index().unwrap();
        let left = set.node(root).children[0];
        set.nodes[left as usize].keys.clear();
        assert!(set.assert_valid().is_err());
    }
}
