//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A multiway tree needs a minimum degree of at least 2.
    #[error("B-tree minimum degree must be greater than 1, got {degree}")]
    DegreeTooSmall { degree: usize },
}
