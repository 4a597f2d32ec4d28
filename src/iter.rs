mod traversal;
mod tree;

use std::{borrow::Borrow, fmt::Debug, ops::Index};

use crate::{Error, Tree, alloc::node_alloc_error};

pub use traversal::{InOrder, PostOrder, PreOrder};
pub use tree::{IntoIter, Iter, Keys, Values};

impl<K, Q: ?Sized, V> Index<&Q> for Tree<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `Tree`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Debug, V: Debug> Debug for Tree<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Tree<K, V> {
    /// Constructs a `Tree<K, V>` from an iterator of key-value pairs.
    ///
    /// Keys are never overwritten: for pairs with equal keys, the first one
    /// wins and the others are dropped.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Tree<K, V> {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for Tree<K, V> {
    /// Inserts every pair whose key is not present yet.
    ///
    /// Like the std collections, this aborts through
    /// [`std::alloc::handle_alloc_error`] if a node cannot be allocated. Use
    /// [`Tree::insert`] to get [`Error::AllocationFailure`] back instead.
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        iter.into_iter()
            .for_each(move |(k, v)| match self.insert(k, v) {
                Ok(()) | Err(Error::DuplicateKey) => {}
                Err(_) => node_alloc_error::<K, V>(),
            });
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for Tree<K, V> {
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

#[cfg(test)]
mod test {
    use crate::{Tree, alloc::failing, testing};
    use pretty_assertions::assert_eq;

    #[test]
    fn index_passes() {
        let mut tree = Tree::new();
        let forty_two_str = "forty two";
        let forty_two = forty_two_str.to_string();
        tree.insert(forty_two.clone(), forty_two.clone()).unwrap();
        assert_eq!(forty_two, tree[forty_two_str]);
        assert_eq!(forty_two, tree[&forty_two]);
    }

    #[test]
    #[should_panic]
    fn index_panics() {
        let tree: Tree<usize, ()> = Tree::new();
        assert_eq!((), tree[&42]);
    }

    #[test]
    fn from_iter_keeps_first_duplicate() {
        let tree: Tree<i32, &str> = [(2, "b"), (1, "a"), (2, "bb")].into_iter().collect();
        testing::check(&tree);
        assert_eq!(2, tree.len());
        assert_eq!(Some(&"b"), tree.get(&2));
    }

    #[test]
    #[should_panic(expected = "could not allocate")]
    fn extend_does_not_drop_entries_on_allocation_failure() {
        let mut tree: Tree<i32, &str> = [(1, "a")].into_iter().collect();
        let _failing = failing::Allocations::fail();
        tree.extend([(1, "duplicate"), (2, "b")]);
    }

    #[test]
    #[should_panic(expected = "could not allocate")]
    fn collect_does_not_drop_entries_on_allocation_failure() {
        let _failing = failing::Allocations::fail();
        let _: Tree<i32, ()> = [(1, ())].into_iter().collect();
    }

    #[test]
    fn extend() {
        let mut tree = Tree::new();
        tree.insert(100, "hundo").unwrap();
        tree.extend(vec![(1, "one"), (100, "ignored")]);
        tree.extend([(&42, &"forty two")]);
        testing::check(&tree);
        assert_eq!(
            vec![(&1, &"one"), (&42, &"forty two"), (&100, &"hundo")],
            tree.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn debug_lists_entries_in_order() {
        let tree: Tree<i32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
        assert_eq!("{1: \"a\", 2: \"b\"}", format!("{tree:?}"));
    }
}
