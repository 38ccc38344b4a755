use std::env;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use anyhow::{ensure, Context, Result};

use crate::domain::schema::PACKAGE_MARKER;

pub const DEFAULT_PACKAGE_DIR: &str = "proto";

#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Include root for protoc and output directory for generated sources.
    pub build_root: PathBuf,
    /// Directory holding the schemas, relative to `build_root`.
    pub package_dir: PathBuf,
    pub extra_includes: Vec<PathBuf>,
    pub compiler_override: Option<PathBuf>,
    pub search_path: Option<OsString>,
    pub handoff: Option<Vec<String>>,
}

impl DriverConfig {
    pub fn new(build_root: impl Into<PathBuf>) -> Self {
        Self {
            build_root: build_root.into(),
            package_dir: PathBuf::from(DEFAULT_PACKAGE_DIR),
            extra_includes: Vec::new(),
            compiler_override: None,
            search_path: None,
            handoff: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        let cwd = env::current_dir().context("failed to read current directory")?;
        Self::from_lookup(|key| env::var_os(key), &cwd)
    }

    /// Builds the configuration from an arbitrary variable source; relative
    /// paths resolve against `cwd`.
    pub fn from_lookup<F>(lookup: F, cwd: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let build_root = non_empty("PROTOBIND_BUILD_ROOT")
            .map(|root| cwd.join(root))
            .unwrap_or_else(|| cwd.to_path_buf());

        let package_dir = non_empty("PROTOBIND_PACKAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PACKAGE_DIR));
        ensure!(
            package_dir
                .components()
                .all(|part| matches!(part, Component::Normal(_) | Component::CurDir)),
            "invalid PROTOBIND_PACKAGE_DIR {}: must be relative to the build root",
            package_dir.display()
        );

        let extra_includes: Vec<PathBuf> = non_empty("PROTOBIND_INCLUDE")
            .map(|paths| env::split_paths(&paths).map(|dir| cwd.join(dir)).collect())
            .unwrap_or_default();

        let compiler_override = non_empty("PROTOC").map(PathBuf::from);
        let search_path = lookup("PATH");

        let handoff = non_empty("PROTOBIND_HANDOFF")
            .map(|raw| {
                raw.into_string()
                    .map_err(|_| anyhow::anyhow!("PROTOBIND_HANDOFF is not valid unicode"))
            })
            .transpose()?
            .and_then(|raw| parse_handoff(&raw));

        Ok(Self {
            build_root,
            package_dir,
            extra_includes,
            compiler_override,
            search_path,
            handoff,
        })
    }

    pub fn schema_root(&self) -> PathBuf {
        self.build_root.join(&self.package_dir)
    }

    pub fn output_dir(&self) -> &Path {
        &self.build_root
    }

    /// Build root first, then any extra include directories.
    pub fn include_dirs(&self) -> Vec<PathBuf> {
        std::iter::once(self.build_root.clone())
            .chain(self.extra_includes.iter().cloned())
            .collect()
    }

    pub fn marker_path(&self) -> PathBuf {
        self.schema_root().join(PACKAGE_MARKER)
    }
}

fn parse_handoff(raw: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::DriverConfig;
    use std::collections::HashMap;
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_working_directory() {
        let cfg = DriverConfig::from_lookup(lookup(&[]), Path::new("/work")).unwrap();
        assert_eq!(cfg.build_root, PathBuf::from("/work"));
        assert_eq!(cfg.schema_root(), PathBuf::from("/work/proto"));
        assert_eq!(cfg.marker_path(), PathBuf::from("/work/proto/__init__.py"));
        assert_eq!(cfg.include_dirs(), vec![PathBuf::from("/work")]);
        assert!(cfg.compiler_override.is_none());
        assert!(cfg.handoff.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = DriverConfig::from_lookup(
            lookup(&[
                ("PROTOC", "/opt/protoc/bin/protoc"),
                ("PROTOBIND_BUILD_ROOT", "pkg"),
                ("PROTOBIND_PACKAGE_DIR", "s2clientprotocol"),
                ("PROTOBIND_HANDOFF", "python -m  build"),
                ("PATH", "/usr/bin"),
            ]),
            Path::new("/work"),
        )
        .unwrap();

        assert_eq!(cfg.build_root, PathBuf::from("/work/pkg"));
        assert_eq!(cfg.schema_root(), PathBuf::from("/work/pkg/s2clientprotocol"));
        assert_eq!(
            cfg.compiler_override,
            Some(PathBuf::from("/opt/protoc/bin/protoc"))
        );
        assert_eq!(cfg.search_path, Some(OsString::from("/usr/bin")));
        assert_eq!(
            cfg.handoff,
            Some(vec!["python".to_string(), "-m".into(), "build".into()])
        );
    }

    #[test]
    fn empty_override_is_ignored() {
        let cfg =
            DriverConfig::from_lookup(lookup(&[("PROTOC", "")]), Path::new("/work")).unwrap();
        assert!(cfg.compiler_override.is_none());
    }

    #[test]
    fn rejects_escaping_package_dir() {
        let result = DriverConfig::from_lookup(
            lookup(&[("PROTOBIND_PACKAGE_DIR", "../elsewhere")]),
            Path::new("/work"),
        );
        assert!(result.is_err());
    }
}
