/// Reasons a tree operation was rejected. None of them leave the tree
/// modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("key already present in the tree")]
    DuplicateKey,
    #[error("key not found in the tree")]
    KeyNotFound,
    #[error("the tree is empty")]
    EmptyTree,
    #[error("could not allocate a {size} byte node")]
    AllocationFailure { size: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
