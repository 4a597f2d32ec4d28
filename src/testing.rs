//! Test support: an invariant walk that shares no code with the balancing
//! logic, and logger setup.
use std::{fmt::Debug, ptr};

use simplelog::{Config, LevelFilter, TestLogger};

use crate::{Color, Node, Tree};

/// Routes `log` output through the test harness so it only shows up for
/// failing tests. Safe to call from every test.
pub(crate) fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

/// Panics unless `tree` is a valid red-black tree whose `len` matches its
/// node count; returns that count.
pub(crate) fn check<K: Ord + Debug, V>(tree: &Tree<K, V>) -> usize {
    let Some(root) = tree.root() else {
        assert_eq!(0, tree.len(), "empty tree with a non-zero len");
        return 0;
    };
    assert!(root.parent().is_none(), "root has a parent");
    assert_eq!(Color::Black, root.color(), "red root {:?}", root.key());
    let (count, _) = walk(root, None, None);
    assert_eq!(tree.len(), count, "len out of sync with the node count");
    count
}

/// Returns (node count, black height counting absent children) of the
/// subtree, checking order bounds, parent links and colors on the way.
fn walk<'a, K: Ord + Debug, V>(
    node: &'a Node<K, V>,
    lower: Option<&'a K>,
    upper: Option<&'a K>,
) -> (usize, usize) {
    let key = node.key();
    if let Some(lower) = lower {
        assert!(lower < key, "{key:?} is not above {lower:?}");
    }
    if let Some(upper) = upper {
        assert!(key < upper, "{key:?} is not below {upper:?}");
    }

    for child in [node.left(), node.right()].into_iter().flatten() {
        assert!(
            child.parent().is_some_and(|p| ptr::eq(p, node)),
            "{:?} does not point back at {key:?}",
            child.key()
        );
        if node.is_red() {
            assert!(child.is_black(), "red {key:?} has red child {:?}", child.key());
        }
    }

    let (left_count, left_height) = node.left().map_or((0, 1), |l| walk(l, lower, Some(key)));
    let (right_count, right_height) =
        node.right().map_or((0, 1), |r| walk(r, Some(key), upper));
    assert_eq!(
        left_height,
        right_height,
        "black heights differ below {key:?}"
    );
    (
        left_count + right_count + 1,
        left_height + usize::from(node.is_black()),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ComingFrom, NodePtrExt, alloc::try_alloc_node};
    use pretty_assertions::assert_eq;

    /// 2 over 1 and 3, everything red, linked by hand.
    fn unbalanced() -> Tree<i32, ()> {
        let nodes = [1, 2, 3].map(|k| try_alloc_node(k, ()).unwrap());
        unsafe {
            Node::link(nodes[0], nodes[1], ComingFrom::Left);
            Node::link(nodes[2], nodes[1], ComingFrom::Right);
        }
        let mut tree = Tree::new();
        tree.root.node = Some(nodes[1]);
        tree.len = 3;
        tree
    }

    #[test]
    fn accepts_valid_tree() {
        let mut tree = unbalanced();
        tree.root.node.set_color(Color::Black);
        assert_eq!(3, check(&tree));
    }

    #[test]
    #[should_panic(expected = "red root")]
    fn rejects_red_root() {
        check(&unbalanced());
    }

    #[test]
    #[should_panic(expected = "has red child")]
    fn rejects_red_red() {
        let mut tree = unbalanced();
        tree.root.node.set_color(Color::Black);
        let mut child = tree.root.node.left();
        let grandchild = try_alloc_node(0, ()).unwrap();
        unsafe { Node::link(grandchild, child.unwrap(), ComingFrom::Left) };
        child.set_color(Color::Red);
        tree.len = 4;
        check(&tree);
    }

    #[test]
    #[should_panic(expected = "black heights differ")]
    fn rejects_uneven_black_height() {
        let mut tree = unbalanced();
        tree.root.node.set_color(Color::Black);
        let mut left = tree.root.node.left();
        left.set_color(Color::Black);
        check(&tree);
    }

    #[test]
    #[should_panic(expected = "len out of sync")]
    fn rejects_stale_len() {
        let mut tree = unbalanced();
        tree.root.node.set_color(Color::Black);
        tree.len = 2;
        check(&tree);
    }
}
