use tracing::warn;

use crate::error::ConfigError;

/// Minimum degree used by [`BTreeSet::new`](super::BTreeSet::new).
pub const DEFAULT_DEGREE: usize = 16;

/// Validated minimum degree `t` of a B-tree; always at least 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Degree(usize);

impl Degree {
    pub fn new(t: usize) -> Result<Self, ConfigError> {
        if t <= 1 {
            warn!(degree = t, "rejecting B-tree minimum degree");
            return Err(ConfigError::DegreeTooSmall { degree: t });
        }
        Ok(Self(t))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Fewest keys a non-root node may hold.
    pub fn min_keys(self) -> usize {
        self.0 - 1
    }

    /// Most keys any node may hold.
    pub fn max_keys(self) -> usize {
        2 * self.0 - 1
    }
}

impl Default for Degree {
    fn default() -> Self {
        Self(DEFAULT_DEGREE)
    }
}

impl TryFrom<usize> for Degree {
    type Error = ConfigError;

    fn try_from(t: usize) -> Result<Self, Self::Error> {
        Self::new(t)
    }
}

/// B-tree node. Children are arena indices; a node without children is a
/// leaf, otherwise it has exactly `keys.len() + 1` of them.
#[derive(Clone, Debug)]
pub struct BNode<K> {
    pub keys: Vec<K>,
    pub children: Vec<u32>,
}

impl<K> BNode<K> {
    pub fn leaf(keys: Vec<K>) -> Self {
        Self {
            keys,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl<K> Default for BNode<K> {
    fn default() -> Self {
        Self::leaf(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_bounds() {
        let d = Degree::new(2).unwrap();
        assert_eq!(d.get(), 2);
        assert_eq!(d.min_keys(), 1);
        assert_eq!(d.max_keys(), 3);
        assert_eq!(Degree::default().get(), DEFAULT_DEGREE);
    }

    #[test]
    fn degree_rejects_one_and_zero() {
        assert_eq!(
            Degree::new(1),
            Err(ConfigError::DegreeTooSmall { degree: 1 })
        );
        assert_eq!(
            Degree::try_from(0),
            Err(ConfigError::DegreeTooSmall { degree: 0 })
        );
    }
}
