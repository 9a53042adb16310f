//! Error type for fallible map lookups.

use thiserror::Error;

/// Errors reported by [`AvlTreeMap`](crate::AvlTreeMap).
///
/// Inserting an existing key and removing an absent key are not errors:
/// the former overwrites the stored value, the latter does nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// The requested key is not present in the map.
    #[error("key not found")]
    KeyNotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
