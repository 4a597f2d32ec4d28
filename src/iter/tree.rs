use std::iter::FusedIterator;

use crate::{Tree, iter::InOrder};

impl<K, V> Tree<K, V> {
    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.in_order(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Tree;
    ///
    /// let mut a = Tree::new();
    /// a.insert(2, "b").unwrap();
    /// a.insert(1, "a").unwrap();
    ///
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbmap::Tree;
    ///
    /// let mut a = Tree::new();
    /// a.insert(1, "hello").unwrap();
    /// a.insert(2, "goodbye").unwrap();
    ///
    /// let values: Vec<&str> = a.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

/// An iterator over the entries of a `Tree`, sorted by key.
///
/// This `struct` is created by the [`iter`] method on [`Tree`].
///
/// [`iter`]: Tree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: InOrder<'a, K, V>,
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v, _)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<(&'a K, &'a V)> {
        self.next_back()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next_back().map(|(k, v, _)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

/// An iterator over the keys of a `Tree`.
///
/// This `struct` is created by the [`keys`] method on [`Tree`]. See its
/// documentation for more.
///
/// [`keys`]: Tree::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a K> {
        self.next_back()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

/// An iterator over the values of a `Tree`.
///
/// This `struct` is created by the [`values`] method on [`Tree`]. See its
/// documentation for more.
///
/// [`values`]: Tree::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a V> {
        self.next_back()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

/// An owning iterator over the entries of a `Tree`, sorted by key.
pub struct IntoIter<K, V>(Tree<K, V>);

impl<K, V> IntoIterator for Tree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter(self)
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.0.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }

    fn last(mut self) -> Option<(K, V)> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.pop_last()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.0.len
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

#[cfg(test)]
mod test {
    use crate::Tree;
    use pretty_assertions::assert_eq;

    fn sample() -> (Tree<i32, String>, [String; 3]) {
        let zero = "zero".to_string();
        let forty_two = "forty_two".to_string();
        let hundo = "hundo".to_string();
        let mut tree = Tree::new();
        tree.insert(100, hundo.clone()).unwrap();
        tree.insert(0, zero.clone()).unwrap();
        tree.insert(42, forty_two.clone()).unwrap();
        (tree, [zero, forty_two, hundo])
    }

    #[test]
    fn iter_empty() {
        let tree = Tree::<usize, ()>::new();
        assert_eq!(None, tree.iter().next());
        assert_eq!(None, tree.iter().next_back());
        assert_eq!(0, tree.iter().len());
    }

    #[test]
    fn iter() {
        let (tree, [zero, forty_two, hundo]) = sample();
        let mut iter = tree.iter();
        assert_eq!(3, iter.len());
        assert_eq!(Some((&0, &zero)), iter.next());
        assert_eq!(Some((&42, &forty_two)), iter.next());
        assert_eq!(Some((&100, &hundo)), iter.next());
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next());

        let mut tree = Tree::new();
        for i in 0..128 {
            tree.insert(i, ()).unwrap();
        }
        let mut iter = tree.iter();
        for i in 0..128 {
            assert_eq!(Some((&i, &())), iter.next());
        }
        assert_eq!(None, iter.next());
    }

    #[test]
    fn iter_rev_insert() {
        let mut tree = Tree::new();
        for i in (0..128).rev() {
            tree.insert(i, ()).unwrap();
        }
        assert!(tree.keys().copied().eq(0..128));
        assert!(tree.keys().rev().copied().eq((0..128).rev()));
    }

    #[test]
    fn iter_both_ends_meet() {
        let (tree, [zero, forty_two, hundo]) = sample();
        let mut iter = tree.iter();
        assert_eq!(Some((&100, &hundo)), iter.next_back());
        assert_eq!(Some((&0, &zero)), iter.next());
        assert_eq!(1, iter.len());
        assert_eq!(Some((&42, &forty_two)), iter.next_back());
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next_back());
    }

    #[test]
    fn keys_and_values() {
        let (tree, [zero, forty_two, hundo]) = sample();
        assert_eq!(vec![0, 42, 100], tree.keys().copied().collect::<Vec<_>>());
        assert_eq!(
            vec![&zero, &forty_two, &hundo],
            tree.values().collect::<Vec<_>>()
        );
        assert_eq!(Some(&100), tree.keys().last());
        assert_eq!(Some(&zero), tree.values().next());
    }

    #[test]
    fn for_loop() {
        let (tree, _) = sample();
        for (k, _v) in &tree {
            // This is a test for compilation.
            let _ = k;
        }
        for (_k, v) in tree {
            // This is a test for compilation.
            let _ = v;
        }
    }

    #[test]
    fn into_iter_empty() {
        let tree = Tree::<usize, ()>::new();
        assert_eq!(0, tree.into_iter().count());
    }

    #[test]
    fn into_iter() {
        let (tree, [zero, forty_two, hundo]) = sample();
        let mut iter = tree.into_iter();
        assert_eq!(3, iter.len());
        assert_eq!(Some((100, hundo)), iter.next_back());
        assert_eq!(
            vec![(0, zero), (42, forty_two)],
            iter.collect::<Vec<_>>()
        );
    }
}
