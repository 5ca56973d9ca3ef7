//! A safe [left-leaning red-black tree](https://en.wikipedia.org/wiki/Left-leaning_red%E2%80%93black_tree)
//! that tracks how many of its nodes are red, and the experiments built on it.
/// The tree itself.
pub mod tree;
/// Reading keys from text input.
pub mod load;
/// Expected red-node percentage over random trees.
pub mod experiment;
/// Errors for loading, experiments and invariant checks.
pub mod error;

pub use error::{ExperimentError, InvariantViolation, LoadError};
pub use tree::RedBlackTree;

/// Builds a [`RedBlackTree`] from a list of keys or from an iterator.
/// # Example
/// ```
/// use red_black_bst::rbt;
///
/// let listed = rbt![3, 1, 2];
/// assert_eq!(listed.size(), 3);
///
/// let collected = rbt!(i in (1..=10).filter(|i| i % 2 == 0));
/// assert_eq!(collected.size(), 5);
/// assert_eq!(collected.contains(&4), true);
/// ```
#[macro_export]
macro_rules! rbt {
    ($var:ident in $iter:expr) => {
        <$crate::RedBlackTree<_> as ::core::iter::FromIterator<_>>::from_iter(
            ::core::iter::IntoIterator::into_iter($iter).map(|$var| $var),
        )
    };
    ($($val:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut tree = $crate::RedBlackTree::new();
        $(tree.insert($val);)*
        tree
    }};
}
