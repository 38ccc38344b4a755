// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// The build driver composes discovery, compilation, and package finalization into one linear run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compiler::{compile_schema, probe_version, resolve_compiler, CompileRequest};
use crate::config::DriverConfig;
use crate::domain::compiler::CompilerPath;
use crate::domain::schema::{is_schema_file, SchemaFile, SchemaSet};
use crate::error::DriverError;
use crate::filesystem::local::LocalFs;
use crate::filesystem::{SchemaFs, SchemaFsHandle};
use crate::runner::process::ProcessRunner;
use crate::runner::{render_command_line, CommandRunner, CommandRunnerHandle};

pub fn discover_schema_files(
    fs: &dyn SchemaFs,
    include_root: &Path,
    schema_root: &Path,
) -> Result<SchemaSet, DriverError> {
    let paths = fs.list_files(schema_root, &is_schema_file).map_err(|err| {
        DriverError::io(format!("failed to scan {}", schema_root.display()), err)
    })?;
    Ok(SchemaSet::from_paths(include_root, paths))
}

/// Ensures the package marker exists; returns whether it had to be created.
pub fn finalize_package(fs: &dyn SchemaFs, marker: &Path) -> Result<bool, DriverError> {
    let created = fs
        .create_if_absent(marker)
        .map_err(|err| DriverError::io(format!("failed to create {}", marker.display()), err))?;
    if created {
        tracing::info!(marker = %marker.display(), "created package marker");
    }
    Ok(created)
}

#[derive(Clone, Debug)]
pub struct BuildReport {
    pub compiler: Option<CompilerPath>,
    pub compiler_version: Option<String>,
    pub compiled: Vec<SchemaFile>,
    pub output_dir: PathBuf,
    pub marker: PathBuf,
    pub marker_created: bool,
    pub handed_off: bool,
}

impl BuildReport {
    /// Binding and stub paths expected for every compiled schema.
    pub fn artifacts(&self) -> Vec<PathBuf> {
        self.compiled
            .iter()
            .flat_map(|schema| schema.artifacts().under(&self.output_dir))
            .collect()
    }
}

#[derive(Clone)]
pub struct Driver {
    config: DriverConfig,
    fs: SchemaFsHandle,
    runner: CommandRunnerHandle,
}

impl Driver {
    pub fn new(config: DriverConfig, fs: SchemaFsHandle, runner: CommandRunnerHandle) -> Self {
        Self { config, fs, runner }
    }

    /// Driver backed by the real filesystem and subprocesses.
    pub fn local(config: DriverConfig) -> Self {
        Self::new(config, Arc::new(LocalFs::new()), Arc::new(ProcessRunner::new()))
    }

    pub fn run(&self) -> Result<BuildReport, DriverError> {
        let cfg = &self.config;
        let schema_root = cfg.schema_root();
        let output_dir = cfg.output_dir().to_path_buf();
        let include_dirs = cfg.include_dirs();

        tracing::info!(root = %schema_root.display(), "compiling protocol buffer files");

        let schemas = discover_schema_files(self.fs.as_ref(), &cfg.build_root, &schema_root)?;

        let (compiler, compiler_version) = if schemas.is_empty() {
            tracing::warn!(root = %schema_root.display(), "no .proto files found");
            (None, None)
        } else {
            let found = resolve_compiler(
                cfg.compiler_override.as_deref(),
                cfg.search_path.as_deref(),
                self.fs.as_ref(),
            )?;
            let version = probe_version(self.runner.as_ref(), &found);
            (Some(found), version)
        };

        let mut compiled = Vec::with_capacity(schemas.len());
        if let Some(resolved) = &compiler {
            for schema in schemas {
                compile_schema(
                    self.runner.as_ref(),
                    &CompileRequest {
                        compiler: resolved,
                        schema: &schema,
                        include_dirs: &include_dirs,
                        output_dir: &output_dir,
                    },
                )?;
                self.warn_missing_artifacts(&schema, &output_dir);
                compiled.push(schema);
            }
        }

        let marker = cfg.marker_path();
        let marker_created = finalize_package(self.fs.as_ref(), &marker)?;

        tracing::info!(compiled = compiled.len(), "protocol buffer compilation complete");

        let handed_off = match &cfg.handoff {
            Some(command) => {
                self.hand_off(command)?;
                true
            }
            None => false,
        };

        Ok(BuildReport {
            compiler,
            compiler_version,
            compiled,
            output_dir,
            marker,
            marker_created,
            handed_off,
        })
    }

    fn warn_missing_artifacts(&self, schema: &SchemaFile, output_dir: &Path) {
        for artifact in schema.artifacts().under(output_dir) {
            if !self.fs.exists(&artifact) {
                tracing::warn!(
                    schema = %schema.relative.display(),
                    artifact = %artifact.display(),
                    "expected generated file not found"
                );
            }
        }
    }

    fn hand_off(&self, command: &[String]) -> Result<(), DriverError> {
        let Some((program, rest)) = command.split_first() else {
            return Ok(());
        };
        let program = Path::new(program);
        let args: Vec<OsString> = rest.iter().map(OsString::from).collect();
        let rendered = render_command_line(program, &args);

        tracing::info!(command = %rendered, "handing off to packaging");

        let output = self
            .runner
            .run(program, &args)
            .map_err(|err| DriverError::io(format!("failed to launch `{}`", rendered), err))?;

        for line in output.stdout.lines() {
            tracing::info!(target: "protobind::handoff", "{}", line);
        }

        if !output.success() {
            return Err(DriverError::HandoffFailed {
                command: rendered,
                status: output.describe_status(),
                stderr: output.stderr,
            });
        }

        if !output.stderr.trim().is_empty() {
            tracing::warn!(
                command = %rendered,
                diagnostics = %output.stderr.trim(),
                "packaging reported warnings"
            );
        }
        Ok(())
    }
}
