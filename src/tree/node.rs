//! Node storage, height bookkeeping and the rotation primitives.

use std::cmp::Ordering;

use super::Keyed;

/// Owned child slot; `None` is an empty subtree.
pub(crate) type Link<R> = Option<Box<Node<R>>>;

/// A record together with its two subtrees
#[derive(Debug)]
pub(crate) struct Node<R> {
    /// Payload, owned by this node alone
    pub(crate) record: R,
    /// Subtree holding strictly smaller keys
    pub(crate) left: Link<R>,
    /// Subtree holding strictly greater keys
    pub(crate) right: Link<R>,
    /// Cached height, 1 for a leaf
    pub(crate) height: u32,
}

impl<R> Node<R> {
    /// Allocate a leaf owning `record`
    pub(crate) fn leaf(record: R) -> Box<Self> {
        Box::new(Self { record, left: None, right: None, height: 1 })
    }

    /// Recompute the cached height from the (possibly new) children
    #[allow(clippy::arithmetic_side_effects)]
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(self.left.as_deref()).max(height(self.right.as_deref()));
    }

    /// height(left) - height(right)
    #[allow(clippy::arithmetic_side_effects)]
    pub(crate) fn balance_factor(&self) -> i64 {
        i64::from(height(self.left.as_deref())) - i64::from(height(self.right.as_deref()))
    }
}

/// Height of an optional subtree; an absent subtree has height 0
pub(crate) fn height<R>(node: Option<&Node<R>>) -> u32 {
    node.map_or(0, |node| node.height)
}

/// Balance factor of an optional subtree; an absent subtree is balanced
pub(crate) fn balance_factor<R>(node: Option<&Node<R>>) -> i64 {
    node.map_or(0, Node::balance_factor)
}

/// Single left rotation around `node`.
///
/// Without a right child there is nothing to rotate and `node` comes back
/// unchanged.
pub(crate) fn rotate_left<R>(mut node: Box<Node<R>>) -> Box<Node<R>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Single right rotation around `node`, the mirror of [`rotate_left`]
pub(crate) fn rotate_right<R>(mut node: Box<Node<R>>) -> Box<Node<R>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

/// The four classic AVL rebalancing cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Imbalance {
    /// Left-heavy, outer grandchild: one right rotation
    LeftLeft,
    /// Left-heavy, inner grandchild: left rotation of the child, then right rotation
    LeftRight,
    /// Right-heavy, outer grandchild: one left rotation
    RightRight,
    /// Right-heavy, inner grandchild: right rotation of the child, then left rotation
    RightLeft,
}

impl Imbalance {
    /// Case selection after `key` was inserted below `node`.
    ///
    /// The case is chosen by which subtree of the heavy child received the key,
    /// not by the child's own balance factor.
    pub(crate) fn after_insert<R: Keyed>(node: &Node<R>, key: &str) -> Option<Self> {
        let factor = node.balance_factor();
        if factor > 1 {
            let child = node.left.as_deref()?;
            match key.cmp(child.record.key()) {
                Ordering::Less => Some(Self::LeftLeft),
                Ordering::Greater => Some(Self::LeftRight),
                Ordering::Equal => None,
            }
        } else if factor < -1 {
            let child = node.right.as_deref()?;
            match key.cmp(child.record.key()) {
                Ordering::Greater => Some(Self::RightRight),
                Ordering::Less => Some(Self::RightLeft),
                Ordering::Equal => None,
            }
        } else {
            None
        }
    }

    /// Case selection after a removal below `node`, driven by the heavy child's
    /// balance factor since a deletion leaves no "which side" signal.
    pub(crate) fn after_remove<R>(node: &Node<R>) -> Option<Self> {
        let factor = node.balance_factor();
        if factor > 1 {
            if balance_factor(node.left.as_deref()) >= 0 {
                Some(Self::LeftLeft)
            } else {
                Some(Self::LeftRight)
            }
        } else if factor < -1 {
            if balance_factor(node.right.as_deref()) <= 0 {
                Some(Self::RightRight)
            } else {
                Some(Self::RightLeft)
            }
        } else {
            None
        }
    }

    /// Restructure `node` and return the new subtree root
    pub(crate) fn apply<R>(self, mut node: Box<Node<R>>) -> Box<Node<R>> {
        match self {
            Self::LeftLeft => rotate_right(node),
            Self::LeftRight => {
                node.left = node.left.take().map(rotate_left);
                rotate_right(node)
            }
            Self::RightRight => rotate_left(node),
            Self::RightLeft => {
                node.right = node.right.take().map(rotate_right);
                rotate_left(node)
            }
        }
    }
}
