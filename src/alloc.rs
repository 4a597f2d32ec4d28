use std::{
    alloc::{Layout, alloc},
    ptr::NonNull,
};

use crate::{Error, Node, Result};

/// Allocates a detached red node, reporting exhaustion instead of aborting.
///
/// The node leaks unless it is linked into a tree or handed to [`own_back`].
pub(crate) fn try_alloc_node<K, V>(key: K, value: V) -> Result<NonNull<Node<K, V>>> {
    let layout = Layout::new::<Node<K, V>>();
    if failing::armed() {
        return Err(Error::AllocationFailure {
            size: layout.size(),
        });
    }
    // SAFETY: Node holds three pointers, so the layout is never zero-sized.
    let raw = unsafe { alloc(layout) }.cast::<Node<K, V>>();
    let node = NonNull::new(raw).ok_or(Error::AllocationFailure {
        size: layout.size(),
    })?;
    // SAFETY: freshly allocated with the layout of Node, nothing aliases it.
    unsafe { node.as_ptr().write(Node::new(key, value)) };
    Ok(node)
}

/// Gives up on a node allocation the way std collections do: through
/// [`std::alloc::handle_alloc_error`], which aborts by default.
///
/// Test builds panic instead so the path can be exercised.
pub(crate) fn node_alloc_error<K, V>() -> ! {
    let layout = Layout::new::<Node<K, V>>();
    #[cfg(not(test))]
    std::alloc::handle_alloc_error(layout);
    #[cfg(test)]
    panic!("{}", Error::AllocationFailure { size: layout.size() });
}


#[cfg(not(test))]
mod failing {
    #[inline(always)]
    pub(crate) const fn armed() -> bool {
        false
    }
}

/// # Safety
///
/// `node` must come from [`try_alloc_node`], be unlinked from every tree, and
/// never be used again.
pub(crate) unsafe fn own_back<K, V>(node: NonNull<Node<K, V>>) -> Box<Node<K, V>> {
    // SAFETY: the global allocator with Layout::new::<Node> is exactly what
    // Box expects.
    unsafe { Box::from_raw(node.as_ptr()) }
}
