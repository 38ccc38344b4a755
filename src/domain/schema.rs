// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// Schema files and the Python artifacts protoc derives from their names.

use std::path::{Path, PathBuf};

pub const SCHEMA_EXTENSION: &str = "proto";
pub const BINDING_SUFFIX: &str = "_pb2.py";
pub const STUB_SUFFIX: &str = "_pb2.pyi";
pub const PACKAGE_MARKER: &str = "__init__.py";

pub fn is_schema_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == SCHEMA_EXTENSION)
        .unwrap_or(false)
}

/// A `.proto` file together with its path relative to the include root.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SchemaFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

impl SchemaFile {
    pub fn new(include_root: &Path, path: PathBuf) -> Self {
        let relative = match path.strip_prefix(include_root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| path.clone()),
        };
        Self { path, relative }
    }

    /// Module path protoc's Python generator uses: extension stripped, `-`
    /// mapped to `_`, and every `.` left in a component opening a directory.
    fn module_stem(&self) -> PathBuf {
        let stem = self.relative.with_extension("");
        stem.iter()
            .flat_map(|part| {
                part.to_string_lossy()
                    .replace('-', "_")
                    .split('.')
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn artifacts(&self) -> GeneratedArtifacts {
        let stem = self.module_stem();
        let file_name = stem
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        GeneratedArtifacts {
            binding: stem.with_file_name(format!("{}{}", file_name, BINDING_SUFFIX)),
            stub: stem.with_file_name(format!("{}{}", file_name, STUB_SUFFIX)),
        }
    }
}

/// Output paths relative to the generated-sources directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub binding: PathBuf,
    pub stub: PathBuf,
}

impl GeneratedArtifacts {
    pub fn under(&self, output_dir: &Path) -> [PathBuf; 2] {
        [output_dir.join(&self.binding), output_dir.join(&self.stub)]
    }
}

#[derive(Clone, Debug, Default)]
pub struct SchemaSet {
    files: Vec<SchemaFile>,
}

impl SchemaSet {
    pub fn from_paths(include_root: &Path, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut files: Vec<SchemaFile> = paths
            .into_iter()
            .filter(|path| is_schema_file(path))
            .map(|path| SchemaFile::new(include_root, path))
            .collect();
        files.sort();
        files.dedup();
        Self { files }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaFile> {
        self.files.iter()
    }
}

impl IntoIterator for SchemaSet {
    type Item = SchemaFile;
    type IntoIter = std::vec::IntoIter<SchemaFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a SchemaSet {
    type Item = &'a SchemaFile;
    type IntoIter = std::slice::Iter<'a, SchemaFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{is_schema_file, SchemaFile, SchemaSet};
    use std::path::{Path, PathBuf};

    #[test]
    fn artifacts_follow_relative_layout() {
        let root = Path::new("/build");
        let schema = SchemaFile::new(root, PathBuf::from("/build/pkg/sub/b.proto"));
        assert_eq!(schema.relative, PathBuf::from("pkg/sub/b.proto"));

        let artifacts = schema.artifacts();
        assert_eq!(artifacts.binding, PathBuf::from("pkg/sub/b_pb2.py"));
        assert_eq!(artifacts.stub, PathBuf::from("pkg/sub/b_pb2.pyi"));
    }

    #[test]
    fn artifacts_replace_hyphens() {
        let root = Path::new("/build");
        let schema = SchemaFile::new(root, PathBuf::from("/build/my-pkg/sc2-api.proto"));
        let artifacts = schema.artifacts();
        assert_eq!(artifacts.binding, PathBuf::from("my_pkg/sc2_api_pb2.py"));
        assert_eq!(artifacts.stub, PathBuf::from("my_pkg/sc2_api_pb2.pyi"));

        let dotted = SchemaFile::new(root, PathBuf::from("/build/pkg/foo.bar.proto"));
        let artifacts = dotted.artifacts();
        assert_eq!(artifacts.binding, PathBuf::from("pkg/foo/bar_pb2.py"));
        assert_eq!(artifacts.stub, PathBuf::from("pkg/foo/bar_pb2.pyi"));
    }

    #[test]
    fn set_keeps_only_schema_files_sorted() {
        let root = Path::new("/build");
        let set = SchemaSet::from_paths(
            root,
            vec![
                PathBuf::from("/build/pkg/z.proto"),
                PathBuf::from("/build/pkg/readme.md"),
                PathBuf::from("/build/pkg/a.proto"),
                PathBuf::from("/build/pkg/a.proto"),
            ],
        );

        let names: Vec<_> = set.iter().map(|s| s.relative.clone()).collect();
        assert_eq!(
            names,
            vec![PathBuf::from("pkg/a.proto"), PathBuf::from("pkg/z.proto")]
        );
        assert!(!is_schema_file(Path::new("pkg/a.proto.bak")));
    }
}
