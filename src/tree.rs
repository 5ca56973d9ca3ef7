use std::cmp::Ordering;

use crate::error::InvariantViolation;

/// A [left-leaning red-black BST](https://en.wikipedia.org/wiki/Left-leaning_red%E2%80%93black_tree)
/// holding a set of keys, with a live count of its red nodes.
/// # Example
/// ```
/// use red_black_bst::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// assert_eq!(tree.insert(5), true);
/// assert_eq!(tree.insert(8), true);
/// // repeat inserts return false
/// assert_eq!(tree.insert(5), false);
///
/// assert_eq!(tree.contains(&5), true);
/// assert_eq!(tree.contains(&6), false);
/// assert_eq!(tree.size(), 2);
/// assert_eq!(tree.percent_red(), 50.0);
/// ```
#[derive(Debug)]
pub struct RedBlackTree<T: Ord> {
    root: Link<T>,
    red_nodes: usize,
    color_flips: usize,
}

type Link<T> = Option<Box<Node<T>>>;

#[derive(Debug)]
struct Node<T: Ord> {
    val: T,
    // color of the link from the parent
    color: Color,
    // nodes in the subtree rooted here, this one included
    size: usize,
    left: Link<T>,
    right: Link<T>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

impl Color {
    fn toggle(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }
}

impl<T: Ord> Node<T> {
    fn new(val: T) -> Box<Self> {
        // new nodes are red by default
        Box::new(Self { val, color: Color::Red, size: 1, left: None, right: None })
    }

    // empty links count as black
    fn is_red(link: &Link<T>) -> bool {
        link.as_ref().map_or(false, |node| node.color == Color::Red)
    }

    fn size(link: &Link<T>) -> usize {
        link.as_ref().map_or(0, |node| node.size)
    }

    fn update_size(&mut self) {
        self.size = 1 + Self::size(&self.left) + Self::size(&self.right);
    }

    fn height(link: &Link<T>) -> usize {
        link.as_ref().map_or(0, |node| 1 + Self::height(&node.left).max(Self::height(&node.right)))
    }

    fn count_red(link: &Link<T>) -> usize {
        link.as_ref().map_or(0, |node| {
            usize::from(node.color == Color::Red) + Self::count_red(&node.left) + Self::count_red(&node.right)
        })
    }
}

impl<T: Ord> RedBlackTree<T> {
    /// Creates a new empty tree.
    pub fn new() -> Self {
        Self { root: None, red_nodes: 0, color_flips: 0 }
    }

    /// Returns the number of keys in the tree.
    /// # Examples
    ///
    /// A newly-created tree has a size of 0:
    ///
    /// ```
    /// # use red_black_bst::RedBlackTree;
    /// #
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.size(), 0);
    /// # tree.insert(5);
    /// # assert_eq!(tree.size(), 1);
    /// ```
    ///
    /// Adding keys increases the size, adding a key twice does not:
    ///
    /// ```
    /// # use red_black_bst::RedBlackTree;
    /// #
    /// # let mut tree = RedBlackTree::new();
    /// tree.insert(5);
    /// assert_eq!(tree.size(), 1);
    /// tree.insert(8);
    /// assert_eq!(tree.size(), 2);
    /// tree.insert(8);
    /// assert_eq!(tree.size(), 2);
    /// ```
    pub fn size(&self) -> usize {
        Node::size(&self.root)
    }

    /// Returns whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of red nodes, as tracked during insertion.
    pub fn red_nodes(&self) -> usize {
        self.red_nodes
    }

    /// Counts the red nodes by walking the whole tree.
    ///
    /// This ignores the counter kept by [`insert`](Self::insert) and should always agree with
    /// [`red_nodes`](Self::red_nodes).
    pub fn count_red_recursive(&self) -> usize {
        Node::count_red(&self.root)
    }

    /// Returns the number of color flips performed since the tree was created.
    pub fn color_flips(&self) -> usize {
        self.color_flips
    }

    /// Returns the percentage of red nodes in the tree, or 0 for an empty tree.
    /// # Example
    /// ```
    /// # use red_black_bst::RedBlackTree;
    /// #
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.percent_red(), 0.0);
    /// tree.insert(1);
    /// tree.insert(2);
    /// // 1 hangs off 2 by a red link
    /// assert_eq!(tree.percent_red(), 50.0);
    /// tree.insert(3);
    /// // the flip leaves a perfectly black tree
    /// assert_eq!(tree.percent_red(), 0.0);
    /// ```
    pub fn percent_red(&self) -> f64 {
        let size = self.size();
        if size > 0 {
            self.red_nodes as f64 / size as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Returns the number of nodes on the longest path from the root, 0 for an empty tree.
    pub fn height(&self) -> usize {
        Node::height(&self.root)
    }

    /// Returns whether the given key is present in the tree.
    /// # Example
    /// ```
    /// # use red_black_bst::RedBlackTree;
    /// #
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(5);
    /// assert_eq!(tree.contains(&5), true);
    /// // returns false for a key not in the tree
    /// assert_eq!(tree.contains(&8), false);
    /// ```
    pub fn contains(&self, val: &T) -> bool {
        let mut cur_node = self.root.as_deref();

        while let Some(node) = cur_node {
            cur_node = match val.cmp(&node.val) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }

        false
    }

    /// Inserts a key into the tree, replacing an equal key already present.
    /// Returns whether the key was not already in the tree.
    /// # Example
    /// ```
    /// # use red_black_bst::RedBlackTree;
    /// #
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.insert(5), true);
    /// assert_eq!(tree.insert(8), true);
    /// // repeat inserts return false
    /// assert_eq!(tree.insert(5), false);
    /// ```
    pub fn insert(&mut self, val: T) -> bool {
        let mut inserted = false;
        let root = self.root.take();
        let mut root = self.put(root, val, &mut inserted);

        // the root is always black between insertions
        if root.color == Color::Red {
            self.red_nodes -= 1;
            root.color = Color::Black;
        }
        self.root = Some(root);

        inserted
    }

    // inserts val below link and hands back the (possibly rotated) subtree root
    fn put(&mut self, link: Link<T>, val: T, inserted: &mut bool) -> Box<Node<T>> {
        let mut node = match link {
            Some(node) => node,
            None => {
                // hit an empty link; hang a new red node here
                self.red_nodes += 1;
                *inserted = true;
                return Node::new(val);
            }
        };

        match val.cmp(&node.val) {
            Ordering::Less => node.left = Some(self.put(node.left.take(), val, inserted)),
            Ordering::Greater => node.right = Some(self.put(node.right.take(), val, inserted)),
            Ordering::Equal => node.val = val,
        }

        // lean a right red link back to the left
        if Node::is_red(&node.right) && !Node::is_red(&node.left) {
            node = Self::rotate_left(node);
        }
        // split two left red links in a row
        if Node::is_red(&node.left) && node.left.as_ref().map_or(false, |left| Node::is_red(&left.left)) {
            node = Self::rotate_right(node);
        }
        // pass a temporary 4-node up
        if Node::is_red(&node.left) && Node::is_red(&node.right) {
            self.flip_colors(&mut node);
        }

        node.update_size();
        node
    }

    // node must have a red right link
    fn rotate_left(mut node: Box<Node<T>>) -> Box<Node<T>> {
        debug_assert!(Node::is_red(&node.right));
        let Some(mut pivot) = node.right.take() else {
            return node;
        };

        // point node->right at pivot->left
        node.right = pivot.left.take();
        // pivot takes over node's color, node hangs off it by a red link
        pivot.color = node.color;
        node.color = Color::Red;
        node.update_size();
        pivot.left = Some(node);
        pivot.update_size();
        pivot
    }

    // node must have a red left link
    fn rotate_right(mut node: Box<Node<T>>) -> Box<Node<T>> {
        debug_assert!(Node::is_red(&node.left));
        let Some(mut pivot) = node.left.take() else {
            return node;
        };

        // point node->left at pivot->right
        node.left = pivot.right.take();
        pivot.color = node.color;
        node.color = Color::Red;
        node.update_size();
        pivot.right = Some(node);
        pivot.update_size();
        pivot
    }

    // node and its two children must have opposite colors
    fn flip_colors(&mut self, node: &mut Node<T>) {
        self.color_flips += 1;
        Self::recolor(&mut self.red_nodes, node);
        if let Some(left) = node.left.as_deref_mut() {
            Self::recolor(&mut self.red_nodes, left);
        }
        if let Some(right) = node.right.as_deref_mut() {
            Self::recolor(&mut self.red_nodes, right);
        }
    }

    fn recolor(red_nodes: &mut usize, node: &mut Node<T>) {
        node.color = node.color.toggle();
        match node.color {
            Color::Red => *red_nodes += 1,
            Color::Black => *red_nodes -= 1,
        }
    }

    /// Walks the whole tree and verifies every structural invariant:
    /// * the root is black,
    /// * no red link leans right and no two red links are consecutive,
    /// * every path from the root to an empty link crosses the same number of black links,
    /// * keys are in strict search order,
    /// * every cached subtree size is correct,
    /// * the red node counter matches a recount.
    /// # Example
    /// ```
    /// # use red_black_bst::RedBlackTree;
    /// #
    /// let tree: RedBlackTree<_> = (1..=100).rev().collect();
    /// assert_eq!(tree.check(), Ok(()));
    /// ```
    pub fn check(&self) -> Result<(), InvariantViolation> {
        if Node::is_red(&self.root) {
            return Err(InvariantViolation::RedRoot);
        }

        Self::check_subtree(&self.root, None, None, 0)?;

        let counted = self.count_red_recursive();
        if counted != self.red_nodes {
            return Err(InvariantViolation::RedCountMismatch { counter: self.red_nodes, counted });
        }

        Ok(())
    }

    // returns the verified subtree size and its black height
    fn check_subtree(
        link: &Link<T>,
        lower: Option<&T>,
        upper: Option<&T>,
        depth: usize,
    ) -> Result<(usize, usize), InvariantViolation> {
        // base case
        let Some(node) = link else {
            return Ok((0, 0));
        };

        let above_lower = lower.map_or(true, |lower| node.val.cmp(lower) == Ordering::Greater);
        let below_upper = upper.map_or(true, |upper| node.val.cmp(upper) == Ordering::Less);
        if !above_lower || !below_upper {
            return Err(InvariantViolation::OutOfOrder { depth });
        }
        if Node::is_red(&node.right) {
            return Err(InvariantViolation::RightLeaningRed { depth });
        }
        if node.color == Color::Red && Node::is_red(&node.left) {
            return Err(InvariantViolation::ConsecutiveReds { depth });
        }

        let (left_size, left_blacks) = Self::check_subtree(&node.left, lower, Some(&node.val), depth + 1)?;
        let (right_size, right_blacks) = Self::check_subtree(&node.right, Some(&node.val), upper, depth + 1)?;

        if left_blacks != right_blacks {
            return Err(InvariantViolation::UnbalancedBlacks { depth, left: left_blacks, right: right_blacks });
        }
        let actual = 1 + left_size + right_size;
        if node.size != actual {
            return Err(InvariantViolation::SizeMismatch { depth, cached: node.size, actual });
        }

        Ok((actual, left_blacks + usize::from(node.color == Color::Black)))
    }
}

impl<T: Ord> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Extend<T> for RedBlackTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for val in iter {
            self.insert(val);
        }
    }
}

impl<T: Ord> FromIterator<T> for RedBlackTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use crate::rbt;

    use super::{Color, Node, RedBlackTree};

    fn root<T: Ord>(tree: &RedBlackTree<T>) -> &Node<T> {
        tree.root.as_deref().expect("tree should not be empty")
    }

    #[test]
    fn basics() {
        // create tree and insert some values
        let mut tree = RedBlackTree::new();
        let mut check_size = 0;
        for i in 1..=30 {
            // only insert values divisible by 2, 3, or 5
            if i % 2 == 0 || i % 3 == 0 || i % 5 == 0 {
                // make sure insertion actually works
                assert_eq!(tree.insert(i), true);
                // make sure size goes up
                check_size += 1;
                assert_eq!(tree.size(), check_size);
                assert_eq!(tree.check(), Ok(()));
            }
        }
        for i in 1..=30 {
            if i % 2 == 0 || i % 3 == 0 || i % 5 == 0 {
                // values already in the tree cannot be inserted again, but can be found
                assert_eq!(tree.insert(i), false);
                assert_eq!(tree.contains(&i), true);
                assert_eq!(tree.size(), check_size);
            } else {
                // make sure *these* values cannot be found
                assert_eq!(tree.contains(&i), false);
            }
        }
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn empty_tree() {
        let tree: RedBlackTree<i32> = RedBlackTree::new();
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.is_empty(), true);
        assert_eq!(tree.percent_red(), 0.0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.red_nodes(), 0);
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn single_key_root_is_black() {
        let tree = rbt![7];
        assert_eq!(root(&tree).color, Color::Black);
        assert_eq!(root(&tree).size, 1);
        assert_eq!(tree.red_nodes(), 0);
    }

    #[test]
    fn rotate_left_on_right_red_link() {
        // 2 lands right of 1 and gets rotated up
        let tree = rbt![1, 2];
        let root = root(&tree);
        assert_eq!(root.val, 2);
        assert_eq!(root.color, Color::Black);
        assert_eq!(root.right.is_none(), true);

        let left = root.left.as_deref().expect("1 should hang left of 2");
        assert_eq!(left.val, 1);
        assert_eq!(left.color, Color::Red);
        assert_eq!(tree.red_nodes(), 1);
        assert_eq!(tree.color_flips(), 0);
    }

    #[test]
    fn increasing_three_keys_balance_out() {
        let tree = rbt![1, 2, 3];
        let root = root(&tree);
        assert_eq!(root.val, 2);
        assert_eq!(root.color, Color::Black);
        assert_eq!(root.size, 3);
        assert_eq!(root.left.as_ref().map(|node| (node.val, node.color)), Some((1, Color::Black)));
        assert_eq!(root.right.as_ref().map(|node| (node.val, node.color)), Some((3, Color::Black)));
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.percent_red(), 0.0);
        assert_eq!(tree.color_flips(), 1);
    }

    #[test]
    fn rotate_right_on_two_left_reds() {
        let tree = rbt![3, 2, 1];
        let root = root(&tree);
        assert_eq!(root.val, 2);
        assert_eq!(root.color, Color::Black);
        assert_eq!(Node::is_red(&root.left), false);
        assert_eq!(Node::is_red(&root.right), false);
        assert_eq!(tree.red_nodes(), 0);
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn flip_colors_on_two_red_children() {
        let mut tree = rbt![2, 1];
        assert_eq!(tree.red_nodes(), 1);
        tree.insert(3);
        // only the flip fires; the root goes red and is blackened again
        assert_eq!(root(&tree).val, 2);
        assert_eq!(root(&tree).color, Color::Black);
        assert_eq!(tree.color_flips(), 1);
        assert_eq!(tree.red_nodes(), 0);
        assert_eq!(tree.count_red_recursive(), 0);
    }

    #[test]
    fn reinsert_keeps_shape_and_colors() {
        let mut tree = rbt!(i in 1..=15);
        let before = format!("{:?}", tree.root);
        let flips = tree.color_flips();
        for i in 1..=15 {
            assert_eq!(tree.insert(i), false);
        }
        assert_eq!(format!("{:?}", tree.root), before);
        assert_eq!(tree.color_flips(), flips);
        assert_eq!(tree.size(), 15);
    }

    #[test]
    fn ascending_sevens_make_a_perfect_tree() {
        let tree = rbt![10, 20, 30, 40, 50, 60, 70];
        assert_eq!(root(&tree).val, 40);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.red_nodes(), 0);
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn sizes_are_cached_per_subtree() {
        let tree = rbt!(i in 0..100);
        let root = root(&tree);
        assert_eq!(root.size, 100);
        assert_eq!(root.size, 1 + Node::size(&root.left) + Node::size(&root.right));
    }

    #[test]
    fn test_macro() {
        // test value form
        let list_tree = rbt![1, 2, 3, 4];
        assert_eq!(list_tree.contains(&1), true);
        assert_eq!(list_tree.contains(&2), true);
        assert_eq!(list_tree.contains(&3), true);
        assert_eq!(list_tree.contains(&4), true);
        // test iterator form
        let iter_tree = rbt!(i in 1..=15);
        for i in 1..=15 {
            assert_eq!(iter_tree.contains(&i), true);
        }
        // make sure iterator form works with a filtered iterator
        let complex_iter_tree = rbt!(i in (1..=30).filter(|i| i % 2 == 0 || i % 3 == 0 || i % 5 == 0));
        assert_eq!(complex_iter_tree.size(), 22);
        assert_eq!(complex_iter_tree.contains(&7), false);
        assert_eq!(complex_iter_tree.check(), Ok(()));
    }
}
