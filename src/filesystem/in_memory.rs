// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// In-memory file tree used by tests.

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::SchemaFs;

#[derive(Clone, Debug, Default)]
struct FileEntry {
    executable: bool,
    contents: String,
}

#[derive(Default)]
pub struct InMemorySchemaFs {
    inner: RwLock<BTreeMap<PathBuf, FileEntry>>,
}

impl InMemorySchemaFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.write(path, contents);
        self
    }

    pub fn with_executable(self, path: impl Into<PathBuf>) -> Self {
        self.inner.write().insert(
            path.into(),
            FileEntry {
                executable: true,
                contents: String::new(),
            },
        );
        self
    }

    pub fn write(&self, path: impl Into<PathBuf>, contents: &str) {
        self.inner.write().insert(
            path.into(),
            FileEntry {
                executable: false,
                contents: contents.to_string(),
            },
        );
    }

    pub fn read(&self, path: &Path) -> Option<String> {
        self.inner.read().get(path).map(|entry| entry.contents.clone())
    }
}

impl SchemaFs for InMemorySchemaFs {
    fn list_files(
        &self,
        root: &Path,
        predicate: &dyn Fn(&Path) -> bool,
    ) -> io::Result<Vec<PathBuf>> {
        let guard = self.inner.read();
        Ok(guard
            .keys()
            .filter(|path| path.starts_with(root) && predicate(path))
            .cloned()
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        let guard = self.inner.read();
        guard.contains_key(path) || guard.keys().any(|file| file.starts_with(path))
    }

    fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .get(path)
            .map(|entry| entry.executable)
            .unwrap_or(false)
    }

    fn find_on_path(&self, name: &str, search_path: &OsStr) -> Option<PathBuf> {
        let with_suffix = format!("{}{}", name, env::consts::EXE_SUFFIX);
        env::split_paths(search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| [dir.join(name), dir.join(&with_suffix)])
            .find(|candidate| self.is_executable(candidate))
    }

    fn create_if_absent(&self, path: &Path) -> io::Result<bool> {
        let mut guard = self.inner.write();
        if guard.contains_key(path) {
            return Ok(false);
        }
        guard.insert(path.to_path_buf(), FileEntry::default());
        Ok(true)
    }
}
