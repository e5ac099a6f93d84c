//! Height-balanced (AVL) binary search tree keyed by string.
//!
//! Each node owns its children outright. Mutating operations are written as
//! recursive functions that take a subtree by value and hand back its new
//! root, so height updates and rotations propagate up the search path as the
//! recursion unwinds.

mod node;

use std::{cmp::Ordering, iter::FusedIterator, mem};

use tracing::{debug, trace};

use crate::error::TreeError;
use node::{Imbalance, Link};
pub(crate) use node::Node;

/// A record that can be stored in an [`AvlTree`]
///
/// Keys are compared byte-wise and must stay fixed while the record is in a
/// tree.
pub trait Keyed {
    /// Unique key used to order the record
    fn key(&self) -> &str;
}

impl Keyed for String {
    fn key(&self) -> &str {
        self
    }
}

/// AVL tree mapping unique string keys to owned records
#[derive(Debug)]
pub struct AvlTree<R> {
    /// Root of the tree; `None` when empty
    root: Link<R>,
}

impl<R> Default for AvlTree<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> AvlTree<R> {
    /// Create an empty tree
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Whether the tree holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; 0 when empty, 1 for a single record
    #[must_use]
    pub fn height(&self) -> u32 {
        node::height(self.root.as_deref())
    }

    /// Number of records, counted by walking the whole tree
    #[must_use]
    pub fn count(&self) -> usize {
        count(self.root.as_deref())
    }

    /// Records in ascending key order
    ///
    /// Every call starts a fresh traversal.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, R> {
        Iter::new(self.root.as_deref())
    }

    /// Records matching `predicate`, in ascending key order
    pub fn traverse<P>(&self, mut predicate: P) -> impl Iterator<Item = &R>
    where
        P: FnMut(&R) -> bool,
    {
        self.iter().filter(move |record| predicate(*record))
    }

    /// Root node, for renderers
    pub(crate) fn root(&self) -> Option<&Node<R>> {
        self.root.as_deref()
    }
}

impl<R: Keyed> AvlTree<R> {
    /// Insert `record`, rebalancing on the way back up.
    ///
    /// Returns `false` when the key is already present; the new record is
    /// dropped and the stored one is left untouched.
    pub fn insert(&mut self, record: R) -> bool {
        let key = record.key().to_owned();
        let (root, inserted) = insert(self.root.take(), record, &key);
        self.root = Some(root);
        inserted
    }

    /// Remove the record stored under `key`, returning it.
    ///
    /// Removing an absent key leaves the tree unchanged.
    pub fn remove(&mut self, key: &str) -> Option<R> {
        let (root, removed) = remove(self.root.take(), key);
        self.root = root;
        removed
    }

    /// Record stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&R> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match key.cmp(node.record.key()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.record),
            };
        }
        None
    }

    /// Whether a record is stored under `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Mutable access for in-place attribute updates; callers must not change
    /// the record's key.
    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut R> {
        let mut cursor = self.root.as_deref_mut();
        while let Some(node) = cursor {
            match key.cmp(node.record.key()) {
                Ordering::Less => cursor = node.left.as_deref_mut(),
                Ordering::Greater => cursor = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.record),
            }
        }
        None
    }

    /// Key at the root, if any
    #[must_use]
    pub fn root_key(&self) -> Option<&str> {
        self.root.as_deref().map(|node| node.record.key())
    }

    /// Check ordering, balance and cached heights across the whole tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`TreeError`] found in a pre-order walk.
    pub fn verify(&self) -> Result<(), TreeError> {
        verify(self.root.as_deref(), None, None).map(drop)
    }
}

impl<R: Keyed> Extend<R> for AvlTree<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, records: I) {
        for record in records {
            self.insert(record);
        }
    }
}

impl<R: Keyed> FromIterator<R> for AvlTree<R> {
    fn from_iter<I: IntoIterator<Item = R>>(records: I) -> Self {
        let mut tree = Self::new();
        tree.extend(records);
        tree
    }
}

impl<'a, R> IntoIterator for &'a AvlTree<R> {
    type Item = &'a R;
    type IntoIter = Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy in-order iterator over an [`AvlTree`]
///
/// Holds at most one pending node per level, so its memory is bounded by the
/// tree height.
#[derive(Debug)]
pub struct Iter<'a, R> {
    /// Nodes whose left subtree has been queued but which are not yet yielded
    stack: Vec<&'a Node<R>>,
}

impl<'a, R> Iter<'a, R> {
    /// Start a traversal at `root`
    fn new(root: Option<&'a Node<R>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.descend_left(root);
        iter
    }

    /// Push `cursor` and its chain of left descendants
    fn descend_left(&mut self, mut cursor: Option<&'a Node<R>>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.left.as_deref();
        }
    }
}

impl<'a, R> Iterator for Iter<'a, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<&'a R> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        Some(&node.record)
    }
}

impl<R> FusedIterator for Iter<'_, R> {}

/// Insert below `link`; returns the new subtree root and whether a node was added
fn insert<R: Keyed>(link: Link<R>, record: R, key: &str) -> (Box<Node<R>>, bool) {
    let Some(mut node) = link else {
        trace!(key, "new leaf");
        return (Node::leaf(record), true);
    };

    match key.cmp(node.record.key()) {
        Ordering::Less => {
            let (child, inserted) = insert(node.left.take(), record, key);
            node.left = Some(child);
            if !inserted {
                return (node, false);
            }
        }
        Ordering::Greater => {
            let (child, inserted) = insert(node.right.take(), record, key);
            node.right = Some(child);
            if !inserted {
                return (node, false);
            }
        }
        Ordering::Equal => {
            debug!(key, "duplicate key ignored");
            return (node, false);
        }
    }

    node.update_height();
    match Imbalance::after_insert(&node, key) {
        Some(case) => {
            debug!(?case, pivot = node.record.key(), key, "rebalancing after insert");
            (case.apply(node), true)
        }
        None => (node, true),
    }
}

/// Remove `key` below `link`; returns the new subtree root and the removed record
fn remove<R: Keyed>(link: Link<R>, key: &str) -> (Link<R>, Option<R>) {
    let Some(mut node) = link else {
        return (None, None);
    };

    let removed = match key.cmp(node.record.key()) {
        Ordering::Less => {
            let (child, removed) = remove(node.left.take(), key);
            node.left = child;
            removed
        }
        Ordering::Greater => {
            let (child, removed) = remove(node.right.take(), key);
            node.right = child;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, None) => {
                let Node { record, .. } = *node;
                return (None, Some(record));
            }
            (Some(child), None) | (None, Some(child)) => {
                let Node { record, .. } = *node;
                return (Some(child), Some(record));
            }
            (Some(left), Some(right)) => {
                // the successor moves into this node; its own node is the one detached
                let (rest, successor) = take_min(right);
                node.left = Some(left);
                node.right = rest;
                Some(mem::replace(&mut node.record, successor))
            }
        },
    };

    (Some(rebalance_after_remove(node)), removed)
}

/// Detach the leftmost record below `node`, rebalancing along the left spine
fn take_min<R: Keyed>(mut node: Box<Node<R>>) -> (Link<R>, R) {
    match node.left.take() {
        None => {
            let Node { record, right, .. } = *node;
            (right, record)
        }
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance_after_remove(node)), min)
        }
    }
}

/// Refresh `node`'s height and apply at most one deletion case
fn rebalance_after_remove<R: Keyed>(mut node: Box<Node<R>>) -> Box<Node<R>> {
    node.update_height();
    match Imbalance::after_remove(&node) {
        Some(case) => {
            debug!(?case, pivot = node.record.key(), "rebalancing after remove");
            case.apply(node)
        }
        None => node,
    }
}

/// Number of nodes below `node`, inclusive
#[allow(clippy::arithmetic_side_effects)]
fn count<R>(node: Option<&Node<R>>) -> usize {
    node.map_or(0, |node| 1 + count(node.left.as_deref()) + count(node.right.as_deref()))
}

/// Validate the subtree at `node` whose keys must lie strictly between the
/// bounds; returns its true height.
#[allow(clippy::arithmetic_side_effects)]
fn verify<R: Keyed>(
    node: Option<&Node<R>>,
    lower: Option<&str>,
    upper: Option<&str>,
) -> Result<u32, TreeError> {
    let Some(node) = node else {
        return Ok(0);
    };
    let key = node.record.key();

    if lower.is_some_and(|bound| key <= bound) || upper.is_some_and(|bound| key >= bound) {
        return Err(TreeError::Unordered { key: key.to_owned() });
    }

    let left = verify(node.left.as_deref(), lower, Some(key))?;
    let right = verify(node.right.as_deref(), Some(key), upper)?;

    let actual = 1 + left.max(right);
    if node.height != actual {
        return Err(TreeError::StaleHeight { key: key.to_owned(), cached: node.height, actual });
    }

    let factor = i64::from(left) - i64::from(right);
    if factor.abs() > 1 {
        return Err(TreeError::Unbalanced { key: key.to_owned(), factor });
    }

    Ok(actual)
}
