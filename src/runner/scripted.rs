// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// Recording runner that answers invocations from a closure instead of spawning processes.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{CommandOutput, CommandRunner};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    pub fn is_version_probe(&self) -> bool {
        self.args.len() == 1 && self.args[0] == "--version"
    }

    /// Final positional argument, which is the schema path for compile calls.
    pub fn last_arg(&self) -> Option<String> {
        self.args.last().map(|arg| arg.to_string_lossy().into_owned())
    }
}

type Responder = Box<dyn Fn(&Invocation) -> io::Result<CommandOutput> + Send + Sync>;

pub struct ScriptedRunner {
    responder: Responder,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Invocation) -> io::Result<CommandOutput> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Every call exits 0; `--version` reports a recent protoc.
    pub fn succeeding() -> Self {
        Self::new(|invocation| {
            let stdout = if invocation.is_version_probe() {
                "libprotoc 25.1\n".to_string()
            } else {
                String::new()
            };
            Ok(CommandOutput {
                status: Some(0),
                stdout,
                stderr: String::new(),
            })
        })
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().clone()
    }

    /// Invocations other than the version probe.
    pub fn compile_invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .iter()
            .filter(|invocation| !invocation.is_version_probe())
            .cloned()
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<CommandOutput> {
        let invocation = Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
        };
        self.invocations.lock().push(invocation.clone());
        (self.responder)(&invocation)
    }
}
