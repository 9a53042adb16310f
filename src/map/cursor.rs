//! Bidirectional cursors over an [`AvlTreeMap`].
//!
//! Nodes keep no link to their parent. Whenever a step has to climb the tree,
//! the parent of the current node is found again by descending from the root
//! and comparing keys, which makes a single step `O(log n)`.

use std::fmt;
use std::ptr;

use super::{AvlTreeMap, Link, Node};

/// A cursor over the entries of a map in ascending key order.
///
/// A cursor points either at an entry or at the end sentinel. Moving forward
/// past the last entry lands on the end sentinel and stays there; moving
/// backward from the end sentinel lands on the last entry.
///
/// Two cursors compare equal when they point at the same node (or both at the
/// end sentinel). Only cursors obtained from the same map should be compared.
///
/// ```
/// use avl_bst::AvlTreeMap;
/// let map: AvlTreeMap<_, _> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
/// let mut cursor = map.cursor_front();
/// let mut values = String::new();
/// while cursor != map.cursor_end() {
///     values.extend(cursor.value());
///     cursor.move_next();
/// }
/// assert_eq!(values, "abc");
/// ```
pub struct Cursor<'a, K, V> {
    root: Option<&'a Node<K, V>>,
    current: Option<&'a Node<K, V>>,
}

/// A cursor over the entries of a map in descending key order.
///
/// Mirrors [`Cursor`]: moving forward visits smaller keys, and moving backward
/// from the end sentinel lands on the entry with the smallest key.
pub struct ReverseCursor<'a, K, V> {
    root: Option<&'a Node<K, V>>,
    current: Option<&'a Node<K, V>>,
}

/// A cursor over the entries of a map in ascending key order with mutable
/// access to the current value.
///
/// The cursor remembers the key of its current entry and looks the node up
/// again from the root on every access, so no reference into the tree is held
/// between calls. Entries can be removed through the cursor while walking.
///
/// ```
/// use avl_bst::AvlTreeMap;
/// let mut map: AvlTreeMap<_, _> = (0..6).map(|k| (k, k * 10)).collect();
/// let mut cursor = map.cursor_front_mut();
/// while let Some(&key) = cursor.key() {
///     if key % 2 == 0 {
///         cursor.remove_current();
///     } else {
///         if let Some(value) = cursor.value_mut() {
///             *value += 1;
///         }
///         cursor.move_next();
///     }
/// }
/// assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, 11), (3, 31), (5, 51)]);
/// ```
pub struct CursorMut<'a, K, V> {
    map: &'a mut AvlTreeMap<K, V>,
    current: Option<K>,
}

fn is_child<K, V>(link: &Link<K, V>, node: &Node<K, V>) -> bool {
    link.as_deref().is_some_and(|child| ptr::eq(child, node))
}

/// Finds the parent of `node` by descending from `root`.
/// Returns `None` if `node` is the root.
fn parent_of<'a, K: Ord, V>(root: &'a Node<K, V>, node: &Node<K, V>) -> Option<&'a Node<K, V>> {
    let mut current = root;
    loop {
        if is_child(&current.left, node) || is_child(&current.right, node) {
            return Some(current);
        }
        current = if node.key < current.key {
            current.left.as_deref()?
        } else if node.key > current.key {
            current.right.as_deref()?
        } else {
            return None;
        };
    }
}

/// Returns the node following `node` in key order.
pub(super) fn successor<'a, K: Ord, V>(
    root: &'a Node<K, V>,
    node: &'a Node<K, V>,
) -> Option<&'a Node<K, V>> {
    if let Some(right) = node.right.as_deref() {
        return Some(right.first());
    }

    // Climb until coming up from a left subtree
    let mut child = node;
    while let Some(parent) = parent_of(root, child) {
        if is_child(&parent.left, child) {
            return Some(parent);
        }
        child = parent;
    }
    None
}

/// Returns the node preceding `node` in key order.
pub(super) fn predecessor<'a, K: Ord, V>(
    root: &'a Node<K, V>,
    node: &'a Node<K, V>,
) -> Option<&'a Node<K, V>> {
    if let Some(left) = node.left.as_deref() {
        return Some(left.last());
    }

    // Climb until coming up from a right subtree
    let mut child = node;
    while let Some(parent) = parent_of(root, child) {
        if is_child(&parent.right, child) {
            return Some(parent);
        }
        child = parent;
    }
    None
}

fn same_node<K, V>(lhs: Option<&Node<K, V>>, rhs: Option<&Node<K, V>>) -> bool {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => ptr::eq(lhs, rhs),
        (None, None) => true,
        _ => false,
    }
}

impl<'a, K: Ord, V> Cursor<'a, K, V> {
    pub(super) fn new(root: Option<&'a Node<K, V>>, current: Option<&'a Node<K, V>>) -> Self {
        Self { root, current }
    }

    /// Returns true if the cursor points at the end sentinel.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the key of the current entry.
    pub fn key(&self) -> Option<&'a K> {
        self.current.map(|node| &node.key)
    }

    /// Returns the value of the current entry.
    pub fn value(&self) -> Option<&'a V> {
        self.current.map(|node| &node.value)
    }

    /// Returns the key and value of the current entry.
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        self.current.map(|node| (&node.key, &node.value))
    }

    /// Moves to the entry with the next larger key.
    pub fn move_next(&mut self) {
        self.current = match (self.root, self.current) {
            (Some(root), Some(node)) => successor(root, node),
            _ => None,
        };
    }

    /// Moves to the entry with the next smaller key.
    /// From the end sentinel this moves to the last entry.
    pub fn move_prev(&mut self) {
        self.current = match (self.root, self.current) {
            (Some(root), Some(node)) => predecessor(root, node),
            (Some(root), None) => Some(root.last()),
            (None, _) => None,
        };
    }
}

impl<'a, K: Ord, V> ReverseCursor<'a, K, V> {
    pub(super) fn new(root: Option<&'a Node<K, V>>, current: Option<&'a Node<K, V>>) -> Self {
        Self { root, current }
    }

    /// Returns true if the cursor points at the end sentinel.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the key of the current entry.
    pub fn key(&self) -> Option<&'a K> {
        self.current.map(|node| &node.key)
    }

    /// Returns the value of the current entry.
    pub fn value(&self) -> Option<&'a V> {
        self.current.map(|node| &node.value)
    }

    /// Returns the key and value of the current entry.
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        self.current.map(|node| (&node.key, &node.value))
    }

    /// Moves to the entry with the next smaller key.
    pub fn move_next(&mut self) {
        self.current = match (self.root, self.current) {
            (Some(root), Some(node)) => predecessor(root, node),
            _ => None,
        };
    }

    /// Moves to the entry with the next larger key.
    /// From the end sentinel this moves to the first entry.
    pub fn move_prev(&mut self) {
        self.current = match (self.root, self.current) {
            (Some(root), Some(node)) => successor(root, node),
            (Some(root), None) => Some(root.first()),
            (None, _) => None,
        };
    }
}

impl<'a, K: Ord + Clone, V> CursorMut<'a, K, V> {
    pub(super) fn new(map: &'a mut AvlTreeMap<K, V>, current: Option<K>) -> Self {
        Self { map, current }
    }

    /// Returns true if the cursor points at the end sentinel.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the key of the current entry.
    pub fn key(&self) -> Option<&K> {
        self.current.as_ref()
    }

    /// Returns the value of the current entry.
    pub fn value(&self) -> Option<&V> {
        self.map.get(self.current.as_ref()?)
    }

    /// Returns a mutable reference to the value of the current entry.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        let key = self.current.as_ref()?;
        self.map.get_mut(key)
    }

    /// Returns a read-only cursor at the current entry.
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        let root = self.map.root.as_deref();
        let current = self
            .current
            .as_ref()
            .and_then(|key| Node::search(root, key));
        Cursor::new(root, current)
    }

    /// Moves to the entry with the next larger key.
    pub fn move_next(&mut self) {
        let mut cursor = self.as_cursor();
        cursor.move_next();
        self.current = cursor.key().cloned();
    }

    /// Moves to the entry with the next smaller key.
    /// From the end sentinel this moves to the last entry.
    pub fn move_prev(&mut self) {
        let mut cursor = self.as_cursor();
        cursor.move_prev();
        self.current = cursor.key().cloned();
    }

    /// Removes the current entry and moves to the entry with the next larger key.
    /// Returns the removed entry, or `None` at the end sentinel.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let mut cursor = self.as_cursor();
        cursor.move_next();
        let next = cursor.key().cloned();
        let key = self.current.take()?;
        self.current = next;
        self.map.remove_entry(&key)
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> Clone for ReverseCursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for ReverseCursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        same_node(self.current, other.current)
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K, V> PartialEq for ReverseCursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        same_node(self.current, other.current)
    }
}

impl<K, V> Eq for ReverseCursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor")
            .field(&self.current.map(|node| (&node.key, &node.value)))
            .finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ReverseCursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReverseCursor")
            .field(&self.current.map(|node| (&node.key, &node.value)))
            .finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.current).finish()
    }
}
