use std::borrow::Cow;
use std::fmt::{self, Debug};

use tracing::debug;

use crate::set::OrderedSet;
use crate::types::{Compare, NaturalOrder};
use crate::util::{assert_links_and_order, first, for_each, height, next, probe, Probe};

use super::types::SplayNode;
use super::util;

const NAME: &str = "Splay Tree";

/// Ordered set backed by a splay tree.
///
/// Lookups restructure the tree, so [`find`](SplaySet::find) takes
/// `&mut self` and there is no shared-reference membership test. A failed
/// `find`, `add` or `remove` still splays the last node visited; only the
/// key set is guaranteed unchanged.
#[derive(Clone)]
pub struct SplaySet<K, C = NaturalOrder> {
    arena: Vec<SplayNode<K>>,
    root: Option<u32>,
    comparator: C,
}

impl<K: PartialOrd> SplaySet<K> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Set holding exactly `key`.
    pub fn single(key: K) -> Self {
        let mut set = Self::new();
        set.add(key);
        set
    }
}

impl<K: PartialOrd> Default for SplaySet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C: Compare<K>> SplaySet<K, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Vec::new(),
            root: None,
            comparator,
        }
    }

    pub fn root_index(&self) -> Option<u32> {
        self.root
    }

    pub fn arena(&self) -> &[SplayNode<K>] {
        &self.arena
    }

    /// Key currently at the root, i.e. the last key touched.
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|r| &self.arena[r as usize].k)
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Splays the matching node, or the last node visited, to the root.
    pub fn find(&mut self, key: &K) -> bool {
        match probe(&self.arena, self.root, key, &self.comparator) {
            Probe::Empty => false,
            Probe::Found(n) => {
                self.root = Some(util::splay(&mut self.arena, n));
                true
            }
            Probe::Vacant { parent, .. } => {
                self.root = Some(util::splay(&mut self.arena, parent));
                false
            }
        }
    }

    pub fn add(&mut self, key: K) -> bool {
        let (parent, left) = match probe(&self.arena, self.root, &key, &self.comparator) {
            Probe::Found(n) => {
                self.root = Some(util::splay(&mut self.arena, n));
                return false;
            }
            Probe::Empty => {
                self.arena.push(SplayNode::new(key));
                self.root = Some(0);
                return true;
            }
            Probe::Vacant { parent, left } => (parent, left),
        };

        self.arena.push(SplayNode::new(key));
        let idx = (self.arena.len() - 1) as u32;
        self.root = Some(util::insert(&mut self.arena, idx, parent, left));
        true
    }

    pub fn remove(&mut self, key: &K) -> bool {
        match probe(&self.arena, self.root, key, &self.comparator) {
            Probe::Empty => false,
            Probe::Vacant { parent, .. } => {
                self.root = Some(util::splay(&mut self.arena, parent));
                false
            }
            Probe::Found(n) => {
                self.root = util::remove(&mut self.arena, n);
                true
            }
        }
    }

    pub fn clear(&mut self) {
        if !self.arena.is_empty() {
            debug!(engine = NAME, len = self.arena.len(), "clearing set");
        }
        self.arena.clear();
        self.root = None;
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        height(&self.arena, self.root)
    }

    /// Moves the content out, leaving an empty set with the same comparator.
    pub fn take(&mut self) -> Self
    where
        C: Clone,
    {
        Self {
            arena: std::mem::take(&mut self.arena),
            root: self.root.take(),
            comparator: self.comparator.clone(),
        }
    }

    pub fn for_each<G: FnMut(&K)>(&self, f: G) {
        for_each(&self.arena, self.root, f);
    }

    pub fn to_vec(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        self.for_each(|k| out.push(k.clone()));
        out
    }

    /// Links and order only; a splay tree has no shape invariant.
    pub fn assert_valid(&self) -> Result<(), String> {
        assert_links_and_order(&self.arena, self.root, &self.comparator, self.arena.len())
    }

    pub fn dump(&self) -> String
    where
        K: Debug,
    {
        util::print(&self.arena, self.root)
    }
}

impl<K, C: Compare<K>> Extend<K> for SplaySet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<K, C: Compare<K> + Default> FromIterator<K> for SplaySet<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::with_comparator(C::default());
        set.extend(iter);
        set
    }
}

impl<K: Debug, C> Debug for SplaySet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        let mut curr = first(&self.arena, self.root);
        while let Some(i) = curr {
            set.entry(&self.arena[i as usize].k);
            curr = next(&self.arena, i);
        }
        set.finish()
    }
}

impl<K, C: Compare<K>> OrderedSet<K> for SplaySet<K, C> {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(NAME)
    }

    fn find(&mut self, key: &K) -> bool {
        SplaySet::find(self, key)
    }

    fn add(&mut self, key: K) -> bool {
        SplaySet::add(self, key)
    }

    fn remove(&mut self, key: &K) -> bool {
        SplaySet::remove(self, key)
    }

    fn clear(&mut self) {
        SplaySet::clear(self)
    }

    fn len(&self) -> usize {
        SplaySet::len(self)
    }

    fn for_each(&self, f: &mut dyn FnMut(&K)) {
        SplaySet::for_each(self, f)
    }

    fn assert_valid(&self) -> Result<(), String> {
        SplaySet::assert_valid(self)
    }
}
