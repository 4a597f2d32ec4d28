use std::{mem, ptr::NonNull};

use log::trace;

use super::{Color, Node, NodePtr, NodePtrExt, Root};

// Public
impl<K, V> Root<K, V> {
    pub(crate) const fn new() -> Self {
        Root { node: None }
    }

    pub(crate) fn first(&self) -> NodePtr<K, V> {
        self.node.map(|n| unsafe { n.as_ref() }.leftmost())
    }

    pub(crate) fn last(&self) -> NodePtr<K, V> {
        self.node.map(|n| unsafe { n.as_ref() }.rightmost())
    }

    pub(crate) fn first_postorder(&self) -> NodePtr<K, V> {
        self.node.map(|n| unsafe { n.as_ref() }.left_deepest_node())
    }

    /// Restores the red-black properties after `node` was linked in as a red
    /// leaf.
    pub(crate) fn insert_color(&mut self, node: NonNull<Node<K, V>>) {
        let mut node: NodePtr<K, V> = Some(node);

        /*
         * Loop invariant: node is red. The only possible violation is a red
         * parent; the root is black so a red parent always has a parent.
         */
        while node != self.node && node.is_red() && node.parent().is_red() {
            let mut parent = node.parent();
            let mut gparent = parent.parent();
            let parent_on_left = parent == gparent.left();
            let mut uncle = if parent_on_left {
                gparent.right()
            } else {
                gparent.left()
            };

            if uncle.is_red() {
                /*
                 * Case 1 - node's uncle is red (color flips).
                 *
                 *       G            g
                 *      / \          / \
                 *     p   u  -->   P   U
                 *    /            /
                 *   n            n
                 *
                 * g's parent might be red: go on at g.
                 */
                trace!("insert: red uncle, flip colors and climb");
                gparent.set_color(Color::Red);
                parent.set_color(Color::Black);
                uncle.set_color(Color::Black);
                node = gparent;
                continue;
            }

            if parent_on_left {
                if node == parent.right() {
                    /*
                     * Case 2 - node is the inner child (left rotate at
                     * parent), which turns it into case 3.
                     *
                     *      G             G
                     *     / \           / \
                     *    p   U  -->    n   U
                     *     \           /
                     *      n         p
                     */
                    trace!("insert: inner right child, rotate parent left");
                    self.rotate_left(parent);
                    node = parent;
                    parent = node.parent();
                }
                /*
                 * Case 3 - node is the outer child (right rotate at
                 * gparent, then swap colors).
                 *
                 *        G           P
                 *       / \         / \
                 *      p   U  -->  n   g
                 *     /                 \
                 *    n                   U
                 */
                trace!("insert: outer left child, rotate grandparent right");
                self.rotate_right(gparent);
            } else {
                if node == parent.left() {
                    trace!("insert: inner left child, rotate parent right");
                    self.rotate_right(parent);
                    node = parent;
                    parent = node.parent();
                }
                trace!("insert: outer right child, rotate grandparent left");
                self.rotate_left(gparent);
            }

            let parent_color = parent.color();
            parent.set_color(gparent.color());
            gparent.set_color(parent_color);
            break;
        }

        self.node.set_color(Color::Black);
    }

    /// Unlinks the entry held by `victim` and rebalances.
    ///
    /// Returns the node that physically left the tree, which holds victim's
    /// key and value but is not necessarily `victim` itself, and the node the
    /// cursor should move to.
    pub(crate) fn erase(
        &mut self,
        victim: NonNull<Node<K, V>>,
    ) -> (NonNull<Node<K, V>>, NodePtr<K, V>) {
        let mut doomed = victim;

        let (left, right) = {
            // SAFETY: victim is linked into this tree.
            let victim = unsafe { victim.as_ref() };
            (victim.left, victim.right)
        };
        if let (Some(_), Some(right)) = (left, right) {
            /*
             * Two children: trade key and value, never color, with the
             * in-order successor and remove the successor's node instead.
             * It has no left child, so we are down to the easy case.
             */
            let successor = unsafe { right.as_ref() }.leftmost();
            trace!("erase: two children, swap payload with the successor");
            // SAFETY: the successor lives in victim's right subtree, so the
            // two nodes never alias.
            unsafe {
                let (victim, successor) = (&mut *victim.as_ptr(), &mut *successor.as_ptr());
                mem::swap(&mut victim.key, &mut successor.key);
                mem::swap(&mut victim.value, &mut successor.value);
            }
            doomed = successor;
        }

        let mut doomed_ptr: NodePtr<K, V> = Some(doomed);
        let mut replacement = doomed_ptr.left().or(doomed_ptr.right());
        let parent = doomed_ptr.parent();
        let both_black = doomed_ptr.is_black() && replacement.is_black();

        let neighbor = match replacement {
            None if parent.is_none() => {
                trace!("erase: last node");
                self.node = None;
                None
            }
            None => {
                if both_black {
                    // The double black sits at the leaf's own position, so it
                    // must be fixed before the leaf goes away.
                    self.fix_double_black(doomed_ptr);
                } else {
                    let mut sibling = unsafe { doomed.as_ref() }.sibling();
                    sibling.set_color(Color::Red);
                }
                // Rebalancing rotates around the leaf, never above it, so its
                // parent is the same node; read it again all the same.
                let parent = doomed_ptr.parent();
                self.change_child(doomed_ptr, None, parent);
                doomed_ptr.set_parent(None);
                parent
            }
            Some(_) => {
                self.change_child(doomed_ptr, replacement, parent);
                replacement.set_parent(parent);
                doomed_ptr.set_left(None);
                doomed_ptr.set_right(None);
                doomed_ptr.set_parent(None);
                if both_black {
                    self.fix_double_black(replacement);
                } else {
                    replacement.set_color(Color::Black);
                }
                replacement
            }
        };

        (doomed, neighbor)
    }
}

// Private

impl<K, V> Root<K, V> {
    /// Resolves a black-height deficit on the paths through `node`.
    fn fix_double_black(&mut self, mut node: NodePtr<K, V>) {
        /*
         * Loop invariant: every path through node has one black node less
         * than the other paths from its parent.
         */
        while node != self.node {
            let mut parent = node.parent();
            let mut sibling = node.and_then(|n| unsafe { n.as_ref() }.sibling());
            let Some(sibling_node) = sibling else {
                trace!("erase: no sibling, push the double black up");
                node = parent;
                continue;
            };
            let (sibling_on_left, sibling_has_red_child) = {
                // SAFETY: linked into this tree; dropped before any write.
                let sibling = unsafe { sibling_node.as_ref() };
                (sibling.is_on_left(), sibling.has_red_child())
            };

            if sibling.is_red() {
                /*
                 * Red sibling - rotate it above parent. The deficit stays on
                 * node, but its new sibling is black.
                 *
                 *     P               S
                 *    / \             / \
                 *   N   s    -->    p   Sr
                 *      / \         / \
                 *     Sl  Sr      N   Sl
                 */
                trace!("erase: red sibling, rotate it above the parent");
                parent.set_color(Color::Red);
                sibling.set_color(Color::Black);
                if sibling_on_left {
                    self.rotate_right(parent);
                } else {
                    self.rotate_left(parent);
                }
                continue;
            }

            if sibling_has_red_child {
                if sibling.left().is_red() {
                    let mut red_child = sibling.left();
                    if sibling_on_left {
                        trace!("erase: left-left case");
                        red_child.set_color(sibling.color());
                        sibling.set_color(parent.color());
                        self.rotate_right(parent);
                    } else {
                        trace!("erase: right-left case");
                        red_child.set_color(parent.color());
                        self.rotate_right(sibling);
                        self.rotate_left(parent);
                    }
                } else {
                    let mut red_child = sibling.right();
                    if sibling_on_left {
                        trace!("erase: left-right case");
                        red_child.set_color(parent.color());
                        self.rotate_left(sibling);
                        self.rotate_right(parent);
                    } else {
                        trace!("erase: right-right case");
                        red_child.set_color(sibling.color());
                        sibling.set_color(parent.color());
                        self.rotate_left(parent);
                    }
                }
                parent.set_color(Color::Black);
                return;
            }

            /*
             * Black sibling with black children - sibling color flip.
             *
             *    (p)           (p)
             *    / \           / \
             *   N   S    -->  N   s
             *      / \           / \
             *     Sl  Sr        Sl  Sr
             *
             * A red p turns black and absorbs the deficit; a black p carries
             * it one level up.
             */
            sibling.set_color(Color::Red);
            if parent.is_black() {
                trace!("erase: black sibling and parent, push the double black up");
                node = parent;
            } else {
                trace!("erase: black sibling, red parent, recolor");
                parent.set_color(Color::Black);
                return;
            }
        }
    }

    /// Replaces `old` by `new` below `parent`, or at the root.
    fn change_child(&mut self, old: NodePtr<K, V>, new: NodePtr<K, V>, parent: NodePtr<K, V>) {
        if let Some(mut parent) = parent {
            let parent = unsafe { parent.as_mut() };
            if parent.left == old {
                parent.left = new;
            } else {
                parent.right = new;
            }
        } else {
            self.node = new;
        }
    }

    /*
     *      N                R
     *     / \              / \
     *    a   R    -->     N   c
     *       / \          / \
     *      b   c        a   b
     */
    pub(crate) fn rotate_left(&mut self, mut node: NodePtr<K, V>) {
        let mut pivot = node.right();
        debug_assert!(pivot.is_some(), "left rotation without a right child");
        let mut inner = pivot.left();
        node.set_right(inner);
        inner.set_parent(node);
        let parent = node.parent();
        pivot.set_parent(parent);
        self.change_child(node, pivot, parent);
        pivot.set_left(node);
        node.set_parent(pivot);
    }

    /*
     *        N            L
     *       / \          / \
     *      L   c  -->   a   N
     *     / \              / \
     *    a   b            b   c
     */
    pub(crate) fn rotate_right(&mut self, mut node: NodePtr<K, V>) {
        let mut pivot = node.left();
        debug_assert!(pivot.is_some(), "right rotation without a left child");
        let mut inner = pivot.right();
        node.set_left(inner);
        inner.set_parent(node);
        let parent = node.parent();
        pivot.set_parent(parent);
        self.change_child(node, pivot, parent);
        pivot.set_right(node);
        node.set_parent(pivot);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ComingFrom, Tree, alloc::try_alloc_node};
    use pretty_assertions::assert_eq;

    fn node(key: i32) -> NonNull<Node<i32, ()>> {
        try_alloc_node(key, ()).unwrap()
    }

    /// (key, parent key) pairs in pre-order.
    fn shape(root: &Root<i32, ()>) -> Vec<(i32, Option<i32>)> {
        fn visit(node: Option<&Node<i32, ()>>, out: &mut Vec<(i32, Option<i32>)>) {
            if let Some(node) = node {
                out.push((node.key, node.parent().map(|p| p.key)));
                visit(node.left(), out);
                visit(node.right(), out);
            }
        }
        let mut out = Vec::new();
        visit(root.node.map(|n| unsafe { n.as_ref() }), &mut out);
        out
    }

    /// Builds, without any balancing,
    ///
    ///      2
    ///     / \
    ///    1   4
    ///       / \
    ///      3   5
    fn five_nodes() -> Tree<i32, ()> {
        let (n1, n2, n3, n4, n5) = (node(1), node(2), node(3), node(4), node(5));
        let mut tree = Tree::new();
        unsafe {
            Node::link(n1, n2, ComingFrom::Left);
            Node::link(n4, n2, ComingFrom::Right);
            Node::link(n3, n4, ComingFrom::Left);
            Node::link(n5, n4, ComingFrom::Right);
        }
        tree.root.node = Some(n2);
        tree.len = 5;
        tree
    }

    #[test]
    fn rotate_left_then_right_round_trips() {
        let mut tree = five_nodes();
        let before = shape(&tree.root);

        let root = tree.root.node;
        tree.root.rotate_left(root);
        assert_eq!(
            vec![
                (4, None),
                (2, Some(4)),
                (1, Some(2)),
                (3, Some(2)),
                (5, Some(4)),
            ],
            shape(&tree.root)
        );

        let root = tree.root.node;
        tree.root.rotate_right(root);
        assert_eq!(before, shape(&tree.root));
    }

    #[test]
    fn rotate_below_root_rewires_grandparent() {
        let mut tree = five_nodes();
        let four = tree.root.node.right();
        tree.root.rotate_right(four);
        assert_eq!(
            vec![
                (2, None),
                (1, Some(2)),
                (3, Some(2)),
                (4, Some(3)),
                (5, Some(4)),
            ],
            shape(&tree.root)
        );
    }

    #[test]
    fn erase_two_children_keeps_color_in_place() {
        let mut tree = five_nodes();
        // Color the unbalanced shape into a valid red-black tree.
        for mut n in [tree.root.node, tree.root.node.left(), tree.root.node.right()] {
            n.set_color(Color::Black);
        }
        let victim = tree.root.node.right();
        let victim = victim.unwrap();

        let (removed, neighbor) = tree.root.erase(victim);
        tree.len -= 1;

        // 4 had two children: its node stays, now holding 5 and still black.
        assert_eq!(4, unsafe { Box::from_raw(removed.as_ptr()) }.key);
        let survivor = unsafe { victim.as_ref() };
        assert_eq!((5, Color::Black), (survivor.key, survivor.color));
        assert_eq!(Some(5), neighbor.map(|n| unsafe { n.as_ref() }.key));
        assert_eq!(
            vec![(2, None), (1, Some(2)), (5, Some(2)), (3, Some(5))],
            shape(&tree.root)
        );
    }
}
