//! The operation contract shared by every engine.

use std::borrow::Cow;

/// Ordered set of unique keys.
///
/// All engines answer these calls identically; they differ only in internal
/// shape and cost. The trait is object safe so a harness can drive engines
/// through `dyn OrderedSet<K>`.
///
/// Duplicate insertion and removal of a missing key are expected outcomes,
/// reported as `false` with the key set left unchanged.
pub trait OrderedSet<K> {
    /// Display name of the engine.
    fn name(&self) -> Cow<'static, str>;

    /// Whether an equivalent key is present.
    ///
    /// Takes `&mut self` because self-adjusting engines restructure on
    /// every lookup.
    fn find(&mut self, key: &K) -> bool;

    /// Inserts `key`; `false` if an equivalent key was already present.
    fn add(&mut self, key: K) -> bool;

    /// Deletes `key`; `false` if it was absent.
    fn remove(&mut self, key: &K) -> bool;

    /// Removes every key. No-op on an empty set.
    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visits keys in ascending order.
    fn for_each(&self, f: &mut dyn FnMut(&K));

    /// Checks every structural invariant of the engine.
    fn assert_valid(&self) -> Result<(), String>;
}
