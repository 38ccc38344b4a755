// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// Wraps the external protoc binary: locating it, probing its version, and compiling one schema.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::domain::compiler::{CompilerPath, COMPILER_NAME};
use crate::domain::schema::SchemaFile;
use crate::error::DriverError;
use crate::filesystem::SchemaFs;
use crate::runner::{render_command_line, CommandRunner};

/// Picks the compiler: an override naming an existing executable wins,
/// otherwise the first `protoc` on the search path.
pub fn resolve_compiler(
    compiler_override: Option<&Path>,
    search_path: Option<&OsStr>,
    fs: &dyn SchemaFs,
) -> Result<CompilerPath, DriverError> {
    if let Some(candidate) = compiler_override {
        if fs.is_executable(candidate) {
            tracing::debug!(compiler = %candidate.display(), "using PROTOC override");
            return Ok(CompilerPath::new(candidate));
        }
        tracing::warn!(
            compiler = %candidate.display(),
            "PROTOC does not name an executable file; falling back to PATH"
        );
    }

    search_path
        .and_then(|paths| fs.find_on_path(COMPILER_NAME, paths))
        .map(CompilerPath::new)
        .ok_or(DriverError::CompilerNotFound)
}

/// Best-effort `protoc --version`; never fails the build.
pub fn probe_version(runner: &dyn CommandRunner, compiler: &CompilerPath) -> Option<String> {
    match runner.run(compiler.as_path(), &[OsString::from("--version")]) {
        Ok(output) if output.success() => {
            let version = output.stdout.trim().to_string();
            tracing::info!(compiler = %compiler, version = %version, "using protoc");
            Some(version)
        }
        Ok(output) => {
            tracing::warn!(
                compiler = %compiler,
                status = %output.describe_status(),
                "protoc version probe failed"
            );
            None
        }
        Err(err) => {
            tracing::warn!(compiler = %compiler, error = %err, "protoc version probe failed");
            None
        }
    }
}

pub struct CompileRequest<'a> {
    pub compiler: &'a CompilerPath,
    pub schema: &'a SchemaFile,
    pub include_dirs: &'a [PathBuf],
    pub output_dir: &'a Path,
}

impl CompileRequest<'_> {
    /// Include flags, binding output, stub output, then the schema path.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self
            .include_dirs
            .iter()
            .map(|dir| flag("--proto_path=", dir.as_os_str()))
            .collect();
        args.push(flag("--python_out=", self.output_dir.as_os_str()));
        args.push(flag("--pyi_out=", self.output_dir.as_os_str()));
        args.push(self.schema.path.clone().into_os_string());
        args
    }
}

fn flag(name: &str, value: &OsStr) -> OsString {
    let mut arg = OsString::from(name);
    arg.push(value);
    arg
}

pub fn compile_schema(
    runner: &dyn CommandRunner,
    request: &CompileRequest<'_>,
) -> Result<(), DriverError> {
    let args = request.args();
    let command = render_command_line(request.compiler.as_path(), &args);

    tracing::info!(schema = %request.schema.relative.display(), "compiling");

    let output = runner
        .run(request.compiler.as_path(), &args)
        .map_err(|err| DriverError::io(format!("failed to launch `{}`", command), err))?;

    if !output.success() {
        return Err(DriverError::CompileFailed {
            schema: request.schema.path.clone(),
            command,
            stderr: output.stderr,
        });
    }

    if !output.stderr.trim().is_empty() {
        tracing::warn!(
            schema = %request.schema.relative.display(),
            diagnostics = %output.stderr.trim(),
            "protoc reported warnings"
        );
    }

    Ok(())
}
