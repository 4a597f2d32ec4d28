use std::{fmt::Debug, ptr::NonNull};

use crate::{Color, ComingFrom, Node, NodePtr};

// Public API.
impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Node {
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
            key,
            value,
        }
    }

    #[inline(always)]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline(always)]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline(always)]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    #[inline(always)]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline(always)]
    pub fn left(&self) -> Option<&Node<K, V>> {
        // SAFETY: children are owned by self and live as long as it does.
        self.left.map(|n| unsafe { n.as_ref() })
    }

    #[inline(always)]
    pub fn right(&self) -> Option<&Node<K, V>> {
        // SAFETY: see left.
        self.right.map(|n| unsafe { n.as_ref() })
    }

    #[inline(always)]
    pub fn parent(&self) -> Option<&Node<K, V>> {
        // SAFETY: a linked node's parent outlives it.
        self.parent.map(|n| unsafe { n.as_ref() })
    }
}

// Crate API.
impl<K, V> Node<K, V> {
    /// Hangs the detached `node` below `parent` on the `direction` side.
    ///
    /// # Safety
    ///
    /// Both pointers must be valid and the target slot of `parent` empty.
    #[inline(always)]
    pub(crate) unsafe fn link(
        mut node: NonNull<Node<K, V>>,
        mut parent: NonNull<Node<K, V>>,
        direction: ComingFrom,
    ) {
        // SAFETY: delegated to the caller.
        unsafe {
            node.as_mut().parent = Some(parent);
            match direction {
                ComingFrom::Left => parent.as_mut().left = Some(node),
                ComingFrom::Right => parent.as_mut().right = Some(node),
            }
        }
    }

    #[inline(always)]
    pub(crate) fn is_on_left(&self) -> bool {
        self.parent()
            .is_some_and(|p| p.left == Some(NonNull::from(self)))
    }

    #[inline(always)]
    pub(crate) fn sibling(&self) -> NodePtr<K, V> {
        let parent = self.parent()?;
        if parent.left == Some(NonNull::from(self)) {
            parent.right
        } else {
            parent.left
        }
    }

    #[inline(always)]
    pub(crate) fn has_red_child(&self) -> bool {
        self.left().is_some_and(Node::is_red) || self.right().is_some_and(Node::is_red)
    }

    #[inline(always)]
    pub(crate) fn leftmost(&self) -> NonNull<Node<K, V>> {
        let mut node = self;
        while let Some(left) = node.left() {
            node = left;
        }
        NonNull::from(node)
    }

    #[inline(always)]
    pub(crate) fn rightmost(&self) -> NonNull<Node<K, V>> {
        let mut node = self;
        while let Some(right) = node.right() {
            node = right;
        }
        NonNull::from(node)
    }

    /// The first node of a post-order walk rooted at self.
    #[inline(always)]
    pub(crate) fn left_deepest_node(&self) -> NonNull<Node<K, V>> {
        let mut node = self;
        while let Some(next) = node.left().or(node.right()) {
            node = next;
        }
        NonNull::from(node)
    }

    /// In-order successor.
    pub(crate) fn next(&self) -> NodePtr<K, V> {
        // If we have a right-hand child, go down and then left as far as we
        // can.
        if let Some(right) = self.right() {
            return Some(right.leftmost());
        }
        // No right-hand children. Everything down and left is smaller than us,
        // so any 'next' node must be in the general direction of our parent.
        // Go up while we are a right-hand child; the first parent we reach
        // from its left side is the one.
        let mut child = Some(NonNull::from(self));
        let mut parent = self.parent;
        while let Some(candidate) = parent {
            // SAFETY: parents of a linked node are valid.
            let candidate = unsafe { candidate.as_ref() };
            if candidate.right != child {
                break;
            }
            child = parent;
            parent = candidate.parent;
        }
        parent
    }

    /// In-order predecessor; the mirror of [`Self::next`].
    pub(crate) fn prev(&self) -> NodePtr<K, V> {
        if let Some(left) = self.left() {
            return Some(left.rightmost());
        }
        let mut child = Some(NonNull::from(self));
        let mut parent = self.parent;
        while let Some(candidate) = parent {
            // SAFETY: parents of a linked node are valid.
            let candidate = unsafe { candidate.as_ref() };
            if candidate.left != child {
                break;
            }
            child = parent;
            parent = candidate.parent;
        }
        parent
    }

    /// Pre-order successor: children first, otherwise the right sibling of
    /// the closest ancestor we reached from the left.
    pub(crate) fn next_preorder(&self) -> NodePtr<K, V> {
        if self.left.is_some() {
            return self.left;
        }
        if self.right.is_some() {
            return self.right;
        }
        let mut child = Some(NonNull::from(self));
        let mut parent = self.parent;
        while let Some(candidate) = parent {
            // SAFETY: parents of a linked node are valid.
            let candidate = unsafe { candidate.as_ref() };
            if candidate.left == child && candidate.right.is_some() {
                return candidate.right;
            }
            child = parent;
            parent = candidate.parent;
        }
        None
    }

    /// Post-order successor.
    pub(crate) fn next_postorder(&self) -> NodePtr<K, V> {
        let parent = self.parent()?;
        if parent.left == Some(NonNull::from(self)) {
            if let Some(right) = parent.right() {
                // We were the parent's left node: the right subtree comes
                // before the parent itself.
                return Some(right.left_deepest_node());
            }
        }
        self.parent
    }
}

impl<K, V> Debug for Node<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{:?}::({:?},{:?})",
            self.color, self.key, self.value
        ))
    }
}
