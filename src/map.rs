//! An ordered map implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::collections::VecDeque;
use std::fmt;
use std::mem;

use log::{debug, trace};

use crate::error::{Error, Result};

mod cursor;
mod iter;

pub use cursor::{Cursor, CursorMut, ReverseCursor};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

/// An ordered map implemented with an AVL tree.
///
/// Nodes own their children exclusively and store no link to their parent.
/// Traversal re-derives ancestry by descending from the root, so every
/// cursor step costs `O(log n)`.
///
/// The map has no interior mutability. Mutation requires `&mut self`, so
/// callers sharing a map between threads must wrap it in their own lock.
///
/// ```
/// use avl_bst::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// map.remove(&1);
/// assert!(map.get(&1).is_none());
/// ```
pub struct AvlTreeMap<K, V> {
    root: Link<K, V>,
    num_nodes: usize,
}

struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
    height: usize,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree, counting edges on the longest path
    /// from the root to a leaf.
    ///
    /// A single entry has height `0`; an empty map has no height.
    pub fn height(&self) -> Option<usize> {
        self.root.as_ref().map(|root| root.height)
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        debug!("clearing map with {} entries", self.num_nodes);
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Node::search(self.root.as_deref(), key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Node::search_mut(self.root.as_deref_mut(), key).map(|node| &mut node.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Node::search(self.root.as_deref(), key).map(|node| (&node.key, &node.value))
    }

    /// Returns true if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Node::search(self.root.as_deref(), key).is_some()
    }

    /// Returns a reference to the value corresponding to the key,
    /// or [`Error::KeyNotFound`] if the key is absent.
    ///
    /// ```
    /// use avl_bst::{AvlTreeMap, Error};
    /// let mut map = AvlTreeMap::new();
    /// map.insert("a", 1);
    /// assert_eq!(map.at("a"), Ok(&1));
    /// assert_eq!(map.at("b"), Err(Error::KeyNotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key,
    /// or [`Error::KeyNotFound`] if the key is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the entry with the smallest key, or `None` if the map is empty.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root
            .as_deref()
            .map(Node::first)
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the largest key, or `None` if the map is empty.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root
            .as_deref()
            .map(Node::last)
            .map(|node| (&node.key, &node.value))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    /// If the map did have this key present, the value is updated and the old
    /// value is returned. The key is not updated and no node is created.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let replaced = Self::insert_into(&mut self.root, key, value);
        if replaced.is_none() {
            self.num_nodes += 1;
        }
        replaced
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    ///
    /// Removing an absent key leaves the map untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = Self::remove_from(&mut self.root, key);
        if removed.is_some() {
            debug_assert!(self.num_nodes >= 1);
            self.num_nodes -= 1;
        } else {
            trace!("remove: key absent, map unchanged");
        }
        removed
    }

    /// Calls `f` for every entry in breadth-first order, level by level from the root.
    ///
    /// ```
    /// use avl_bst::AvlTreeMap;
    /// let map: AvlTreeMap<_, _> = (1..=3).map(|k| (k, k * 10)).collect();
    /// let mut keys = Vec::new();
    /// map.traverse_level_order(|k, _| keys.push(*k));
    /// assert_eq!(keys, [2, 1, 3]);
    /// ```
    pub fn traverse_level_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        let mut queue = VecDeque::new();
        queue.extend(self.root.as_deref());
        while let Some(node) = queue.pop_front() {
            f(&node.key, &node.value);
            queue.extend(node.left.as_deref());
            queue.extend(node.right.as_deref());
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    /// Use `iter().rev()` to walk the map in descending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.num_nodes)
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.root.as_deref_mut(), self.num_nodes)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }

    /// Returns a cursor at the entry with the smallest key,
    /// or at the end sentinel if the map is empty.
    pub fn cursor_front(&self) -> Cursor<'_, K, V> {
        let root = self.root.as_deref();
        Cursor::new(root, root.map(Node::first))
    }

    /// Returns a cursor at the end sentinel.
    pub fn cursor_end(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.root.as_deref(), None)
    }

    /// Returns a cursor at the entry with the given key, or `None` if it is absent.
    pub fn cursor_at<Q>(&self, key: &Q) -> Option<Cursor<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root.as_deref();
        Node::search(root, key).map(|node| Cursor::new(root, Some(node)))
    }

    /// Returns a reverse cursor at the entry with the largest key,
    /// or at the end sentinel if the map is empty.
    pub fn rcursor_front(&self) -> ReverseCursor<'_, K, V> {
        let root = self.root.as_deref();
        ReverseCursor::new(root, root.map(Node::last))
    }

    /// Returns a reverse cursor at the end sentinel.
    pub fn rcursor_end(&self) -> ReverseCursor<'_, K, V> {
        ReverseCursor::new(self.root.as_deref(), None)
    }

    /// Returns a mutable cursor at the entry with the smallest key,
    /// or at the end sentinel if the map is empty.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V>
    where
        K: Clone,
    {
        let first = self.first_key_value().map(|(key, _)| key.clone());
        CursorMut::new(self, first)
    }

    /// Returns a mutable cursor at the entry with the given key,
    /// or `None` if it is absent.
    pub fn cursor_at_mut<Q>(&mut self, key: &Q) -> Option<CursorMut<'_, K, V>>
    where
        K: Borrow<Q> + Clone,
        Q: Ord + ?Sized,
    {
        let key = self.get_key_value(key)?.0.clone();
        Some(CursorMut::new(self, Some(key)))
    }

    /// Asserts the structural invariants of the tree: stored heights,
    /// AVL balance at every node, strictly ascending keys and the entry count.
    ///
    /// # Panics
    ///
    /// Panics if any invariant is violated.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        fn check_node<K: Ord, V>(node: &Node<K, V>) -> usize {
            let mut height = 0;
            let mut left_height = 0;
            let mut right_height = 0;
            let mut num_nodes = 1;

            // Check left child node
            if let Some(left) = node.left.as_deref() {
                assert!(left.key < node.key);
                num_nodes += check_node(left);
                left_height = left.height + 1;
                height = cmp::max(height, left_height);
            }

            // Check right child node
            if let Some(right) = node.right.as_deref() {
                assert!(right.key > node.key);
                num_nodes += check_node(right);
                right_height = right.height + 1;
                height = cmp::max(height, right_height);
            }

            // Check height
            assert_eq!(node.height, height);

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            num_nodes
        }

        let num_nodes = self.root.as_deref().map_or(0, check_node);
        assert_eq!(num_nodes, self.num_nodes);

        // Check global ordering
        let mut keys = self.keys();
        if let Some(mut prev) = keys.next() {
            for key in keys {
                assert!(prev < key);
                prev = key;
            }
        }
    }

    fn insert_into(link: &mut Link<K, V>, key: K, value: V) -> Option<V> {
        let replaced = match link {
            None => {
                *link = Some(Node::create(key, value));
                return None;
            }
            Some(node) => match key.cmp(&node.key) {
                Ordering::Less => Self::insert_into(&mut node.left, key, value),
                Ordering::Greater => Self::insert_into(&mut node.right, key, value),
                Ordering::Equal => return Some(mem::replace(&mut node.value, value)),
            },
        };
        // A new node was linked somewhere below, fix up on the way back
        if replaced.is_none() {
            Node::rebalance(link);
        }
        replaced
    }

    fn remove_from<Q>(link: &mut Link<K, V>, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = link.as_mut()?;
        let removed = match key.cmp(node.key.borrow()) {
            Ordering::Less => Self::remove_from(&mut node.left, key),
            Ordering::Greater => Self::remove_from(&mut node.right, key),
            Ordering::Equal => Node::unlink(link),
        };
        if removed.is_some() {
            Node::rebalance(link);
        }
        removed
    }
}

impl<K, V> Node<K, V> {
    fn create(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 0,
        })
    }

    fn first(&self) -> &Self {
        let mut node = self;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        node
    }

    fn last(&self) -> &Self {
        let mut node = self;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        node
    }

    fn search<'a, Q>(root: Option<&'a Self>, key: &Q) -> Option<&'a Self>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = root;
        while let Some(node) = current {
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        current
    }

    fn search_mut<'a, Q>(root: Option<&'a mut Self>, key: &Q) -> Option<&'a mut Self>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = root;
        while let Some(node) = current {
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        None
    }

    // Height of a possibly empty subtree; an empty subtree counts as -1.
    fn height_of(link: &Link<K, V>) -> isize {
        link.as_ref().map_or(-1, |node| node.height as isize)
    }

    fn balance_factor(&self) -> isize {
        Self::height_of(&self.left) - Self::height_of(&self.right)
    }

    fn adjust_height(&mut self) {
        self.height = cmp::max(
            self.left.as_ref().map_or(0, |left| left.height + 1),
            self.right.as_ref().map_or(0, |right| right.height + 1),
        );
    }

    /// Unlinks the node at `link` and returns its entry.
    /// A node with two children takes over the entry of its in-order successor,
    /// which is then spliced out of the right subtree instead.
    fn unlink(link: &mut Link<K, V>) -> Option<(K, V)> {
        let mut node = link.take()?;
        if node.left.is_some() {
            if let Some(successor) = Self::take_first(&mut node.right) {
                let Node { key, value, .. } = *successor;
                let key = mem::replace(&mut node.key, key);
                let value = mem::replace(&mut node.value, value);
                *link = Some(node);
                return Some((key, value));
            }
        }

        // Stem or leaf, splice in the only child (if any)
        *link = node.left.take().or_else(|| node.right.take());
        let Node { key, value, .. } = *node;
        Some((key, value))
    }

    /// Detaches the node with the smallest key from the subtree at `link`,
    /// rebalancing every node on the path back up.
    fn take_first(link: &mut Link<K, V>) -> Link<K, V> {
        match link {
            Some(node) if node.left.is_some() => {
                let first = Self::take_first(&mut node.left);
                Self::rebalance(link);
                first
            }
            _ => {
                let mut first = link.take()?;
                *link = first.right.take();
                Some(first)
            }
        }
    }

    /// Restores AVL condition (balance) at given link if necessary and adjusts height.
    /// Resulting balance will be +1, 0 or -1 height difference between left and right subtree.
    /// Initial balance must not exceed +2 or -2, which always holds after a single update.
    fn rebalance(link: &mut Link<K, V>) {
        let Some(node) = link.as_mut() else {
            return;
        };
        node.adjust_height();
        match node.balance_factor() {
            2 => {
                // Left subtree too high, decide by the shape of the left child
                if node.left.as_ref().is_some_and(|left| left.balance_factor() < 0) {
                    Self::rotate_left_right(link);
                } else {
                    Self::rotate_right(link);
                }
            }
            -2 => {
                if node.right.as_ref().is_some_and(|right| right.balance_factor() > 0) {
                    Self::rotate_right_left(link);
                } else {
                    Self::rotate_left(link);
                }
            }
            factor => debug_assert!(factor.abs() <= 1),
        }
    }

    fn rotate_left(link: &mut Link<K, V>) {
        let Some(mut node) = link.take() else {
            return;
        };
        match node.right.take() {
            Some(mut right) => {
                trace!("rotate left at height {}", node.height);
                node.right = right.left.take();
                node.adjust_height();
                right.left = Some(node);
                right.adjust_height();
                *link = Some(right);
            }
            None => *link = Some(node),
        }
    }

    fn rotate_right(link: &mut Link<K, V>) {
        let Some(mut node) = link.take() else {
            return;
        };
        match node.left.take() {
            Some(mut left) => {
                trace!("rotate right at height {}", node.height);
                node.left = left.right.take();
                node.adjust_height();
                left.right = Some(node);
                left.adjust_height();
                *link = Some(left);
            }
            None => *link = Some(node),
        }
    }

    fn rotate_left_right(link: &mut Link<K, V>) {
        if let Some(node) = link.as_mut() {
            trace!("left-right double rotation at height {}", node.height);
            Self::rotate_left(&mut node.left);
        }
        Self::rotate_right(link);
    }

    fn rotate_right_left(link: &mut Link<K, V>) {
        if let Some(node) = link.as_mut() {
            trace!("right-left double rotation at height {}", node.height);
            Self::rotate_right(&mut node.right);
        }
        Self::rotate_left(link);
    }
}

impl<K: Ord, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone> Clone for AvlTreeMap<K, V> {
    // Rebuilt by in-order insertion, so the copy derives its own heights.
    fn clone(&self) -> Self {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V: PartialEq> PartialEq for AvlTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Ord, V: Eq> Eq for AvlTreeMap<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> IntoIterator for AvlTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root, self.num_nodes)
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a mut AvlTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
