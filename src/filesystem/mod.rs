// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// Filesystem abstraction so discovery and finalization run against disk or an in-memory tree.

pub mod in_memory;
pub mod local;

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub trait SchemaFs: Send + Sync {
    /// Every regular file under `root`, recursively, accepted by `predicate`.
    /// A missing root yields an empty list.
    fn list_files(
        &self,
        root: &Path,
        predicate: &dyn Fn(&Path) -> bool,
    ) -> io::Result<Vec<PathBuf>>;

    fn exists(&self, path: &Path) -> bool;

    fn is_executable(&self, path: &Path) -> bool;

    /// First executable called `name` in the directories of `search_path`.
    fn find_on_path(&self, name: &str, search_path: &OsStr) -> Option<PathBuf>;

    /// Creates an empty file unless one is already present. Returns whether it was created.
    fn create_if_absent(&self, path: &Path) -> io::Result<bool>;
}

pub type SchemaFsHandle = Arc<dyn SchemaFs>;
