use std::{iter::FusedIterator, marker::PhantomData};

use crate::{Color, Node, NodePtr, Tree};

impl<K, V> Tree<K, V> {
    /// Visits `(key, value, color)` triples left subtree first, then the
    /// node, then the right subtree; that is, sorted by key.
    pub fn in_order(&self) -> InOrder<'_, K, V> {
        InOrder {
            first: self.root.first(),
            last: self.root.last(),
            len: self.len,
            _phantom: PhantomData,
        }
    }

    /// Visits `(key, value, color)` triples node first, then its left and
    /// right subtrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::{Color, Tree};
    ///
    /// let tree: Tree<_, _> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
    /// let walk: Vec<_> = tree.pre_order().map(|(k, _, c)| (*k, c)).collect();
    /// assert_eq!(walk, [(2, Color::Black), (1, Color::Red), (3, Color::Red)]);
    /// ```
    pub fn pre_order(&self) -> PreOrder<'_, K, V> {
        PreOrder {
            next: self.root.node,
            len: self.len,
            _phantom: PhantomData,
        }
    }

    /// Visits `(key, value, color)` triples left and right subtrees first,
    /// the node last.
    pub fn post_order(&self) -> PostOrder<'_, K, V> {
        PostOrder {
            next: self.root.first_postorder(),
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

#[inline(always)]
fn entry<'a, K, V>(node: &'a Node<K, V>) -> (&'a K, &'a V, Color) {
    (&node.key, &node.value, node.color)
}

/// Sorted walk over a `Tree`, from both ends.
///
/// This `struct` is created by the [`in_order`] method on [`Tree`].
///
/// [`in_order`]: Tree::in_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct InOrder<'a, K, V> {
    first: NodePtr<K, V>,
    last: NodePtr<K, V>,
    len: usize,
    _phantom: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (&'a K, &'a V, Color);

    fn next(&mut self) -> Option<Self::Item> {
        // len, not the pointers, tells when both ends have met.
        if self.len == 0 {
            return None;
        }
        let node = unsafe { self.first?.as_ref() };
        self.len -= 1;
        self.first = node.next();
        Some(entry(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> DoubleEndedIterator for InOrder<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = unsafe { self.last?.as_ref() };
        self.len -= 1;
        self.last = node.prev();
        Some(entry(node))
    }
}

impl<K, V> ExactSizeIterator for InOrder<'_, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> FusedIterator for InOrder<'_, K, V> {}

impl<K, V> Clone for InOrder<'_, K, V> {
    fn clone(&self) -> Self {
        InOrder {
            first: self.first,
            last: self.last,
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

/// This `struct` is created by the [`pre_order`] method on [`Tree`].
///
/// [`pre_order`]: Tree::pre_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PreOrder<'a, K, V> {
    next: NodePtr<K, V>,
    len: usize,
    _phantom: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for PreOrder<'a, K, V> {
    type Item = (&'a K, &'a V, Color);

    fn next(&mut self) -> Option<Self::Item> {
        let node = unsafe { self.next?.as_ref() };
        self.len -= 1;
        self.next = node.next_preorder();
        Some(entry(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for PreOrder<'_, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> FusedIterator for PreOrder<'_, K, V> {}

impl<K, V> Clone for PreOrder<'_, K, V> {
    fn clone(&self) -> Self {
        PreOrder {
            next: self.next,
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

/// This `struct` is created by the [`post_order`] method on [`Tree`].
///
/// [`post_order`]: Tree::post_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PostOrder<'a, K, V> {
    next: NodePtr<K, V>,
    len: usize,
    _phantom: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for PostOrder<'a, K, V> {
    type Item = (&'a K, &'a V, Color);

    fn next(&mut self) -> Option<Self::Item> {
        let node = unsafe { self.next?.as_ref() };
        self.len -= 1;
        self.next = node.next_postorder();
        Some(entry(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for PostOrder<'_, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> FusedIterator for PostOrder<'_, K, V> {}

impl<K, V> Clone for PostOrder<'_, K, V> {
    fn clone(&self) -> Self {
        PostOrder {
            next: self.next,
            len: self.len,
            _phantom: PhantomData,
        }
    }
}
