// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// CompilerPath is the resolved protoc reference used for every invocation of one build.

use std::fmt;
use std::path::{Path, PathBuf};

pub const COMPILER_NAME: &str = "protoc";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerPath(PathBuf);

impl CompilerPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_inner(self) -> PathBuf {
        self.0
    }
}

impl fmt::Display for CompilerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
