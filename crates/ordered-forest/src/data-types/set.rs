use std::borrow::Cow;
use std::fmt::{self, Debug};
use std::marker::PhantomData;

use tracing::debug;

use crate::set::OrderedSet;
use crate::types::{Compare, KeyNode, NaturalOrder};
use crate::util::{first, for_each, next, probe, Probe};

/// Balancing callbacks required by [`TreeSet`].
///
/// The core handles descent, duplicates and arena growth; the engine only
/// restores its invariants around an attached leaf or a doomed node.
pub trait SetTreeOps<K, N>
where
    N: KeyNode<K>,
{
    /// Display name of the engine.
    const NAME: &'static str;

    fn new_node(key: K) -> N;

    /// Node that becomes the root of an empty tree.
    fn new_root(key: K) -> N {
        Self::new_node(key)
    }

    /// Attaches the detached node `node` under `parent`, rebalances and
    /// returns the root.
    fn insert(arena: &mut [N], root: u32, node: u32, parent: u32, left: bool) -> u32;

    /// Deletes the key stored at `node`, frees exactly one arena slot and
    /// returns the root.
    fn remove(arena: &mut Vec<N>, root: u32, node: u32) -> Option<u32>;

    fn assert_valid<C: Compare<K>>(
        arena: &[N],
        root: Option<u32>,
        comparator: &C,
    ) -> Result<(), String>;

    fn print(arena: &[N], root: Option<u32>) -> String
    where
        K: Debug;
}

/// Arena-backed ordered set core shared by the rebalancing binary trees.
///
/// The arena is dense: slot count always equals the key count, so teardown
/// and deep copies are flat `Vec` operations independent of tree depth.
pub struct TreeSet<K, N, O, C>
where
    N: KeyNode<K>,
    O: SetTreeOps<K, N>,
{
    arena: Vec<N>,
    root: Option<u32>,
    comparator: C,
    _k: PhantomData<K>,
    _ops: PhantomData<O>,
}

impl<K, N, O, C> Clone for TreeSet<K, N, O, C>
where
    N: KeyNode<K> + Clone,
    O: SetTreeOps<K, N>,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            root: self.root,
            comparator: self.comparator.clone(),
            _k: PhantomData,
            _ops: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.arena.clone_from(&source.arena);
        self.root = source.root;
        self.comparator = source.comparator.clone();
    }
}

impl<K, N, O> TreeSet<K, N, O, NaturalOrder>
where
    K: PartialOrd,
    N: KeyNode<K>,
    O: SetTreeOps<K, N>,
{
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

impl<K, N, O> Default for TreeSet<K, N, O, NaturalOrder>
where
    K: PartialOrd,
    N: KeyNode<K>,
    O: SetTreeOps<K, N>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, N, O, C> TreeSet<K, N, O, C>
where
    N: KeyNode<K>,
    O: SetTreeOps<K, N>,
    C: Compare<K>,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Vec::new(),
            root: None,
            comparator,
            _k: PhantomData,
            _ops: PhantomData,
        }
    }

    pub fn root_index(&self) -> Option<u32> {
        self.root
    }

    pub fn arena(&self) -> &[N] {
        &self.arena
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn contains(&self, key: &K) -> bool {
        matches!(
            probe(&self.arena, self.root, key, &self.comparator),
            Probe::Found(_)
        )
    }

    pub fn find(&self, key: &K) -> bool {
        self.contains(key)
    }

    pub fn add(&mut self, key: K) -> bool {
        let (parent, left) = match probe(&self.arena, self.root, &key, &self.comparator) {
            Probe::Found(_) => return false,
            Probe::Empty => {
                self.arena.push(O::new_root(key));
                self.root = Some(0);
                return true;
            }
            Probe::Vacant { parent, left } => (parent, left),
        };

        self.arena.push(O::new_node(key));
        let idx = (self.arena.len() - 1) as u32;
        let root = self.root.expect("non-empty tree has a root");
        self.root = Some(O::insert(&mut self.arena, root, idx, parent, left));
        true
    }

    pub fn remove(&mut self, key: &K) -> bool {
        let Probe::Found(node) = probe(&self.arena, self.root, key, &self.comparator) else {
            return false;
        };
        let root = self.root.expect("found key implies a root");
        self.root = O::remove(&mut self.arena, root, node);
        true
    }

    pub fn clear(&mut self) {
        if !self.arena.is_empty() {
            debug!(engine = O::NAME, len = self.arena.len(), "clearing set");
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

    /// Moves the content out, leaving an empty set with the same comparator.
    pub fn take(&mut self) -> Self
    where
        C: Clone,
    {
        Self {
            arena: std::mem::take(&mut self.arena),
            root: self.root.take(),
            comparator: self.comparator.clone(),
            _k: PhantomData,
            _ops: PhantomData,
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

    pub fn assert_valid(&self) -> Result<(), String> {
        O::assert_valid(&self.arena, self.root, &self.comparator)
    }

    /// Box-drawing dump of the tree shape and per-node metadata.
    pub fn dump(&self) -> String
    where
        K: Debug,
    {
        O::print(&self.arena, self.root)
    }
}

impl<K, N, O, C> Extend<K> for TreeSet<K, N, O, C>
where
    N: KeyNode<K>,
    O: SetTreeOps<K, N>,
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<K, N, O, C> FromIterator<K> for TreeSet<K, N, O, C>
where
    N: KeyNode<K>,
    O: SetTreeOps<K, N>,
    C: Compare<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::with_comparator(C::default());
        set.extend(iter);
        set
    }
}

impl<K, N, O, C> Debug for TreeSet<K, N, O, C>
where
    K: Debug,
    N: KeyNode<K>,
    O: SetTreeOps<K, N>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        let mut curr = first(&self.arena, self.root);
        while let Some(i) = curr {
            set.entry(self.arena[i as usize].key());
            curr = next(&self.arena, i);
        }
        set.finish()
    }
}

impl<K, N, O, C> OrderedSet<K> for TreeSet<K, N, O, C>
where
    N: KeyNode<K>,
    O: SetTreeOps<K, N>,
    C: Compare<K>,
{
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(O::NAME)
    }

    fn find(&mut self, key: &K) -> bool {
        self.contains(key)
    }

    fn add(&mut self, key: K) -> bool {
        TreeSet::add(self, key)
    }

    fn remove(&mut self, key: &K) -> bool {
        TreeSet::remove(self, key)
    }

    fn clear(&mut self) {
        TreeSet::clear(self)
    }

    fn len(&self) -> usize {
        TreeSet::len(self)
    }

    fn for_each(&self, f: &mut dyn FnMut(&K)) {
        TreeSet::for_each(self, f)
    }

    fn assert_valid(&self) -> Result<(), String> {
        TreeSet::assert_valid(self)
    }
}
