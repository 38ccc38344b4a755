// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// Subprocess capability: the driver shells out only through CommandRunner.

pub mod process;
pub mod scripted;

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn describe_status(&self) -> String {
        match self.status {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

pub trait CommandRunner: Send + Sync {
    /// Runs `program` to completion, capturing both output streams.
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<CommandOutput>;
}

pub type CommandRunnerHandle = Arc<dyn CommandRunner>;

pub fn render_command_line(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
