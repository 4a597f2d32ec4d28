use std::{borrow::Borrow, cmp::Ordering::*, marker::PhantomData, ptr::NonNull};

use log::debug;

use crate::{
    ComingFrom, Error, Node, NodePtr, Result, Root, Tree,
    alloc::{own_back, try_alloc_node},
};

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for Tree<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V> Tree<K, V> {
    pub const fn new() -> Self {
        Tree {
            root: Root::new(),
            cursor: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node, for read-only structural walks (printers, checkers).
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.node.map(|n| unsafe { n.as_ref() })
    }

    /// The entry last inserted or found, or the neighbor of the last removed
    /// one.
    pub fn cursor(&self) -> Option<(&K, &V)> {
        self.cursor.map(|n| {
            let n = unsafe { n.as_ref() };
            (&n.key, &n.value)
        })
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn height<K, V>(node: Option<&Node<K, V>>) -> usize {
            node.map_or(0, |n| 1 + height(n.left()).max(height(n.right())))
        }
        height(self.root())
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.first().map(|e| {
            let e = unsafe { e.as_ref() };
            (&e.key, &e.value)
        })
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.last().map(|e| {
            let e = unsafe { e.as_ref() };
            (&e.key, &e.value)
        })
    }

    /// Frees every node. Iterative: descend to a leaf, unhook it from its
    /// parent, free it, climb back.
    pub fn clear(&mut self) {
        let freed = self.len;
        let mut current = self.root.node.take();
        while let Some(node) = current {
            let node_ref = unsafe { node.as_ref() };
            if node_ref.left.is_some() {
                current = node_ref.left;
                continue;
            }
            if node_ref.right.is_some() {
                current = node_ref.right;
                continue;
            }
            let parent = node_ref.parent;
            // Don't erase => no rebalancing overhead on the way out.
            if let Some(mut parent) = parent {
                let parent = unsafe { parent.as_mut() };
                if parent.left == current {
                    parent.left = None;
                } else {
                    parent.right = None;
                }
            }
            // SAFETY: unlinked above; the tree no longer reaches it.
            drop(unsafe { own_back(node) });
            current = parent;
        }
        self.cursor = None;
        self.len = 0;
        if freed > 0 {
            debug!("clear: freed {freed} nodes");
        }
    }

    /// Unlinks `node`, frees it and hands back its payload.
    fn pop_node(&mut self, node: NonNull<Node<K, V>>) -> (K, V) {
        let (removed, neighbor) = self.root.erase(node);
        self.cursor = neighbor;
        self.len -= 1;
        // SAFETY: erase unlinked it; neither the tree nor the cursor reach it.
        let removed = unsafe { own_back(removed) };
        (removed.key, removed.value)
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.root.first()?;
        Some(self.pop_node(first))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.root.last()?;
        Some(self.pop_node(last))
    }
}

impl<K, V> Tree<K, V> {
    fn find<Q>(&self, key: &Q) -> NodePtr<K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.node;
        while let Some(candidate) = node {
            let candidate = unsafe { candidate.as_ref() };
            match key.cmp(candidate.key.borrow()) {
                Equal => break,
                Greater => node = candidate.right,
                Less => node = candidate.left,
            }
        }
        node
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|e| {
            let e = unsafe { e.as_ref() };
            (&e.key, &e.value)
        })
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|mut e| &mut unsafe { e.as_mut() }.value)
    }

    /// Looks `key` up and, when found, moves the cursor onto it.
    pub fn search<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        match self.find(key) {
            Some(node) => {
                self.cursor = Some(node);
                true
            }
            None => false,
        }
    }

    /// Inserts a new entry and moves the cursor onto it.
    ///
    /// Existing keys are never overwritten: the call fails with
    /// [`Error::DuplicateKey`] and the tree is left untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<()>
    where
        K: Ord,
    {
        let mut parent = None;
        let mut direction = ComingFrom::Left;
        let mut link = self.root.node;
        while let Some(candidate) = link {
            parent = link;
            let candidate = unsafe { candidate.as_ref() };
            match key.cmp(&candidate.key) {
                Equal => {
                    debug!("insert: rejected duplicate key");
                    return Err(Error::DuplicateKey);
                }
                Greater => {
                    direction = ComingFrom::Right;
                    link = candidate.right;
                }
                Less => {
                    direction = ComingFrom::Left;
                    link = candidate.left;
                }
            }
        }

        // Nothing is linked before the allocation succeeds.
        let node = try_alloc_node(key, value).inspect_err(|e| debug!("insert: {e}"))?;
        match parent {
            // SAFETY: the descent ended on parent's empty `direction` slot.
            Some(parent) => unsafe { Node::link(node, parent, direction) },
            None => self.root.node = Some(node),
        }
        self.root.insert_color(node);
        self.cursor = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Removes `key` and returns its entry.
    ///
    /// The cursor moves to the node that took the removed one's place, or to
    /// the parent of the vacated position, or nowhere once the tree is empty.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<(K, V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        if self.root.node.is_none() {
            debug!("delete: the tree is empty");
            return Err(Error::EmptyTree);
        }
        let Some(node) = self.find(key) else {
            debug!("delete: key not found");
            return Err(Error::KeyNotFound);
        };
        Ok(self.pop_node(node))
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.delete(key).ok().map(|(_, v)| v)
    }

    /// Removes every leaf but the root, as one pass over the current shape:
    /// nodes that turn into leaves along the way stay. Returns how many
    /// entries went away.
    pub fn prune(&mut self) -> usize
    where
        K: Ord + Clone,
    {
        let leaves: Vec<K> = self
            .pre_order_nodes()
            .filter(|n| n.parent.is_some() && n.left.is_none() && n.right.is_none())
            .map(|n| n.key.clone())
            .collect();
        let pruned = leaves
            .iter()
            .filter(|key| self.delete(*key).is_ok())
            .count();
        debug!("prune: removed {pruned} leaves");
        pruned
    }

    fn pre_order_nodes(&self) -> impl Iterator<Item = &Node<K, V>> {
        std::iter::successors(self.root(), |n| {
            n.next_preorder().map(|next| unsafe { next.as_ref() })
        })
    }
}
