//! Filtered filesystem view.
//!
//! Presents a read-only view rooted at a concrete directory whose top-level listing contains
//! only an explicitly declared set of file names. Child directories are passed through
//! unfiltered.

use crate::error::MultimigratorError;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A directory entry as returned by [`PathsFs::read_dir`].
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// A filesystem view rooted at `root`, exposing only the declared file names at the top level.
#[derive(Debug, Clone)]
pub struct PathsFs {
    root: PathBuf,
    declared: BTreeSet<String>,
    /// Preserves the caller's declaration order for `ReadDir(".")`.
    declared_order: Vec<String>,
}

/// Mirrors Go's `fs.ValidPath`: no leading/trailing slash, no `.`/`..` components, not empty
/// (except the root, which is represented by `"."` and handled separately by callers).
fn valid_path(name: &str) -> bool {
    if name.is_empty() || name.starts_with('/') {
        return false;
    }
    name.split('/').all(|part| !part.is_empty() && part != "." && part != "..")
}

impl PathsFs {
    /// Constructs a view rooted at `root`, exposing exactly `declared_names` at the top level.
    /// Each declared name must exist under `root` at construction time.
    pub fn new(root: impl AsRef<Path>, declared_names: Vec<String>) -> Result<Self, MultimigratorError> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(MultimigratorError::InvalidRoot);
        }
        let canonical_root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::fs::canonicalize(root).or_else(|_| {
                std::env::current_dir().map(|cwd| cwd.join(root))
            })?
        };

        for name in &declared_names {
            fs::metadata(canonical_root.join(name))?;
        }

        Ok(PathsFs {
            root: canonical_root,
            declared: declared_names.iter().cloned().collect(),
            declared_order: declared_names,
        })
    }

    fn check_allowed(&self, name: &str) -> Result<(), MultimigratorError> {
        if !valid_path(name) {
            return Err(MultimigratorError::InvalidPath(name.to_string()));
        }
        if !self.declared.contains(name) {
            return Err(MultimigratorError::NotExist(name.to_string()));
        }
        Ok(())
    }

    /// Opens `name`, which must be one of the declared names.
    pub fn open(&self, name: &str) -> Result<fs::File, MultimigratorError> {
        self.check_allowed(name)?;
        Ok(fs::File::open(self.root.join(name))?)
    }

    /// Reads the contents of `name` as a string.
    pub fn read_to_string(&self, name: &str) -> Result<String, MultimigratorError> {
        self.check_allowed(name)?;
        Ok(fs::read_to_string(self.root.join(name))?)
    }

    /// Lists the root's declared entries (`name == "."`), or delegates to the real filesystem for
    /// any other directory.
    pub fn read_dir(&self, name: &str) -> Result<Vec<DirEntry>, MultimigratorError> {
        if name == "." {
            return Ok(self
                .declared_order
                .iter()
                .map(|n| DirEntry {
                    name: n.clone(),
                    is_dir: self.root.join(n).is_dir(),
                })
                .collect());
        }

        if !valid_path(name) {
            return Err(MultimigratorError::InvalidPath(name.to_string()));
        }
        let path = self.root.join(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("multimigrator-pathsfs-test-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn open_declared_file_succeeds() {
        let dir = make_temp_dir("open-ok");
        fs::write(dir.join("1.txt"), "one").unwrap();
        fs::write(dir.join("2.txt"), "two").unwrap();

        let view = PathsFs::new(&dir, vec!["1.txt".to_string(), "2.txt".to_string()]).unwrap();
        assert!(view.open("1.txt").is_ok());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn open_undeclared_file_fails_not_exist() {
        let dir = make_temp_dir("open-notexist");
        let view = PathsFs::new(&dir, vec![]).unwrap();
        let err = view.open("1.txt").unwrap_err();
        assert!(matches!(err, MultimigratorError::NotExist(_)));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn read_dir_root_lists_only_declared_entries() {
        let dir = make_temp_dir("readdir-root");
        fs::write(dir.join("1.txt"), "one").unwrap();
        fs::write(dir.join("2.txt"), "two").unwrap();

        let view = PathsFs::new(&dir, vec!["1.txt".to_string()]).unwrap();
        let entries = view.read_dir(".").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "1.txt");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn read_dir_nested_directory_is_unfiltered() {
        let dir = make_temp_dir("readdir-nested");
        let nested = dir.join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("1.txt"), "one").unwrap();
        fs::write(nested.join("2.txt"), "two").unwrap();

        let view = PathsFs::new(&dir, vec!["nested".to_string()]).unwrap();
        let entries = view.read_dir("nested").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "1.txt");
        assert_eq!(entries[1].name, "2.txt");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn empty_root_is_invalid() {
        let err = PathsFs::new("", vec![]).unwrap_err();
        assert!(matches!(err, MultimigratorError::InvalidRoot));
    }
}
