// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// Blocking std::process runner used outside tests.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Command;

use super::{CommandOutput, CommandRunner};

#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<CommandOutput> {
        tracing::debug!(program = %program.display(), ?args, "spawning subprocess");

        let output = Command::new(program).args(args).output()?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
