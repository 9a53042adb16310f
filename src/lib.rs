//! An ordered map implemented with an AVL tree whose nodes carry no parent links.
//!
//! [`AvlTreeMap`] keeps unique keys in sorted order and guarantees `O(log n)`
//! lookup, insertion and removal by rebalancing with rotations after every
//! structural change. Every node exclusively owns its children, so the tree
//! can be walked in both directions only by re-descending from the root:
//! [`Cursor`], [`ReverseCursor`] and [`CursorMut`] do exactly that.
//!
//! ```
//! use avl_bst::AvlTreeMap;
//!
//! let mut map = AvlTreeMap::new();
//! for (key, value) in [(1, 'c'), (2, 'b'), (3, 'd'), (0, 'a'), (-1, 'g')] {
//!     map.insert(key, value);
//! }
//! assert_eq!(map.height(), Some(2));
//!
//! let descending: String = map.values().rev().collect();
//! assert_eq!(descending, "dbcag");
//! ```
//!
//! The map logs rotations at `trace` level through the [`log`] facade.

#![forbid(unsafe_code)]

mod error;
mod map;

pub use error::{Error, Result};
pub use map::{
    AvlTreeMap, Cursor, CursorMut, IntoIter, Iter, IterMut, Keys, ReverseCursor, Values, ValuesMut,
};

#[cfg(test)]
mod tests;
