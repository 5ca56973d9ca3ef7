use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::LoadError;
use crate::tree::RedBlackTree;

/// Builds a tree from the whitespace-separated integers on the first line of `reader`.
///
/// Later lines are ignored. An empty source or a blank first line gives an empty tree. The first
/// token that is not an `i32` aborts the whole load.
/// # Example
/// ```
/// # use red_black_bst::load::load_tree;
/// #
/// let tree = load_tree("5 3\t8 3\n42".as_bytes()).unwrap();
/// assert_eq!(tree.size(), 3);
/// assert_eq!(tree.contains(&42), false);
///
/// assert!(load_tree("5 three 8".as_bytes()).is_err());
/// ```
pub fn load_tree<R: BufRead>(mut reader: R) -> Result<RedBlackTree<i32>, LoadError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let mut tree = RedBlackTree::new();
    for token in line.split_whitespace() {
        let key = token.parse::<i32>().map_err(|source| LoadError::Parse { token: token.to_owned(), source })?;
        tree.insert(key);
    }

    debug!(keys = tree.size(), red = tree.red_nodes(), "loaded tree");
    Ok(tree)
}

/// Opens the file at `path` and loads it with [`load_tree`].
pub fn load_file(path: impl AsRef<Path>) -> Result<RedBlackTree<i32>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open { path: path.to_path_buf(), source })?;

    info!("Reading input values from: {}", path.display());
    load_tree(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::error::LoadError;

    use super::{load_file, load_tree};

    #[test]
    fn first_line_only() {
        let tree = load_tree("1 2 3 4\n5 6 7\n".as_bytes()).unwrap();
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.contains(&4), true);
        assert_eq!(tree.contains(&5), false);
    }

    #[test]
    fn any_whitespace_separates() {
        let tree = load_tree("  -7\t12   0 \r\n".as_bytes()).unwrap();
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.contains(&-7), true);
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn duplicates_collapse() {
        let tree = load_tree("9 9 9 1".as_bytes()).unwrap();
        assert_eq!(tree.size(), 2);
    }

    #[test]
    fn empty_input_gives_empty_tree() {
        let tree = load_tree("".as_bytes()).unwrap();
        assert_eq!(tree.is_empty(), true);
        assert_eq!(tree.percent_red(), 0.0);

        let tree = load_tree("\n1 2 3".as_bytes()).unwrap();
        assert_eq!(tree.is_empty(), true);
    }

    #[test]
    fn bad_token_aborts() {
        match load_tree("1 2 x3 4".as_bytes()) {
            Err(LoadError::Parse { token, .. }) => assert_eq!(token, "x3"),
            other => panic!("expected a parse error, got {other:?}"),
        }
        // out of i32 range
        assert!(matches!(load_tree("2147483648".as_bytes()), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1 2 3 4 5 6 7 8 9 10").unwrap();

        let tree = load_file(file.path()).unwrap();
        assert_eq!(tree.size(), 10);
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        match load_file(&path) {
            Err(LoadError::Open { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected an open error, got {other:?}"),
        }
    }
}
