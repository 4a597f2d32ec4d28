//! An ordered map backed by a red-black tree.
//!
//! Nodes are heap allocated and linked with raw pointers: children own,
//! parents and the cursor only observe.
mod alloc;
mod error;
mod iter;
mod node;
mod root;
mod tree;

#[cfg(test)]
mod testing;

use std::{marker::PhantomData, ptr::NonNull};

pub use error::{Error, Result};
pub use iter::{InOrder, IntoIter, Iter, Keys, PostOrder, PreOrder, Values};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// Which child slot of its parent a node hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComingFrom {
    Left,
    Right,
}

pub(crate) type NodePtr<K, V> = Option<NonNull<Node<K, V>>>;

/// Null-tolerant accessors over [`NodePtr`]; an absent node reads as black
/// and ignores writes.
pub(crate) trait NodePtrExt {
    type Key;
    type Value;

    fn color(&self) -> Color;
    fn is_black(&self) -> bool;
    fn is_red(&self) -> bool;
    fn left(&self) -> NodePtr<Self::Key, Self::Value>;
    fn parent(&self) -> NodePtr<Self::Key, Self::Value>;
    fn right(&self) -> NodePtr<Self::Key, Self::Value>;
    fn set_color(&mut self, color: Color);
    fn set_left(&mut self, left: NodePtr<Self::Key, Self::Value>);
    fn set_parent(&mut self, parent: NodePtr<Self::Key, Self::Value>);
    fn set_right(&mut self, right: NodePtr<Self::Key, Self::Value>);
}

impl<K, V> NodePtrExt for NodePtr<K, V> {
    type Key = K;
    type Value = V;

    #[inline(always)]
    fn color(&self) -> Color {
        self.map_or(Color::Black, |v| unsafe { v.as_ref() }.color)
    }

    #[inline(always)]
    fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    #[inline(always)]
    fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    #[inline(always)]
    fn left(&self) -> NodePtr<Self::Key, Self::Value> {
        self.and_then(|v| unsafe { v.as_ref() }.left)
    }

    #[inline(always)]
    fn parent(&self) -> NodePtr<Self::Key, Self::Value> {
        self.and_then(|v| unsafe { v.as_ref() }.parent)
    }

    #[inline(always)]
    fn right(&self) -> NodePtr<Self::Key, Self::Value> {
        self.and_then(|v| unsafe { v.as_ref() }.right)
    }

    #[inline(always)]
    fn set_color(&mut self, color: Color) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.color = color;
        }
    }

    #[inline(always)]
    fn set_left(&mut self, left: NodePtr<Self::Key, Self::Value>) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.left = left;
        }
    }

    #[inline(always)]
    fn set_parent(&mut self, parent: NodePtr<Self::Key, Self::Value>) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.parent = parent;
        }
    }

    #[inline(always)]
    fn set_right(&mut self, right: NodePtr<Self::Key, Self::Value>) {
        if let Some(node) = self {
            unsafe { node.as_mut() }.right = right;
        }
    }
}

impl<K, V> From<&Node<K, V>> for NodePtr<K, V> {
    fn from(node: &Node<K, V>) -> Self {
        Some(NonNull::from(node))
    }
}

/// One key/value pair of a [`Tree`], together with its color and links.
pub struct Node<K, V> {
    pub(crate) parent: NodePtr<K, V>,
    pub(crate) left: NodePtr<K, V>,
    pub(crate) right: NodePtr<K, V>,
    pub(crate) color: Color,
    pub(crate) key: K,
    pub(crate) value: V,
}

/// The bare red-black machinery: root pointer, rotations and rebalancing.
/// It knows nothing about keys; [`Tree`] does the searching.
pub(crate) struct Root<K, V> {
    pub(crate) node: NodePtr<K, V>,
}

/// An ordered map from `K` to `V` kept balanced as a red-black tree.
///
/// # Examples
///
/// ```
/// use rbmap::{Error, Tree};
///
/// let mut tree = Tree::new();
/// tree.insert(2, "b").unwrap();
/// tree.insert(1, "a").unwrap();
/// assert_eq!(Err(Error::DuplicateKey), tree.insert(1, "again"));
///
/// assert!(tree.search(&1));
/// assert_eq!(Some((&1, &"a")), tree.cursor());
///
/// let keys: Vec<_> = tree.keys().copied().collect();
/// assert_eq!(keys, [1, 2]);
/// ```
pub struct Tree<K, V> {
    root: Root<K, V>,
    cursor: NodePtr<K, V>,
    len: usize,
    _marker: PhantomData<Box<Node<K, V>>>,
}

pub type RBTree<K, V> = Tree<K, V>;
