//! Error types for the red_black_bst crate

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// A broken tree invariant found by [`RedBlackTree::check`](crate::RedBlackTree::check).
///
/// Depths count from 0 at the root.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("root is red")]
    RedRoot,

    #[error("red link leans right at depth {depth}")]
    RightLeaningRed { depth: usize },

    #[error("two red links in a row at depth {depth}")]
    ConsecutiveReds { depth: usize },

    #[error("key out of search order at depth {depth}")]
    OutOfOrder { depth: usize },

    #[error("unbalanced black links at depth {depth}: {left} on the left, {right} on the right")]
    UnbalancedBlacks { depth: usize, left: usize, right: usize },

    #[error("cached subtree size {cached} at depth {depth}, but {actual} nodes counted")]
    SizeMismatch { depth: usize, cached: usize, actual: usize },

    #[error("red node counter is {counter}, but {counted} red nodes counted")]
    RedCountMismatch { counter: usize, counted: usize },
}

/// Errors that can occur while loading keys from text input
#[derive(Error, Debug)]
pub enum LoadError {
    /// Input file could not be opened
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token is not an integer key
    #[error("invalid key {token:?}: {source}")]
    Parse {
        token: String,
        #[source]
        source: ParseIntError,
    },
}

/// Errors from an invalid experiment configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    #[error("no input sizes configured")]
    NoSizes,

    #[error("trial count must be at least 1")]
    NoTrials,

    #[error("invalid input size range: min {min} is greater than max {max}")]
    InvalidSizeRange { min: usize, max: usize },
}
