// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// Failure taxonomy for a binding build; every variant is fatal to the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub const INSTALL_GUIDANCE: &str = "Please install protobuf compiler:\n  \
     - Ubuntu/Debian: apt-get install protobuf-compiler\n  \
     - macOS: brew install protobuf\n  \
     - Windows: Download from https://github.com/protocolbuffers/protobuf/releases\n\
     Or set PROTOC environment variable to point to protoc executable.";

pub const VERSION_HINT: &str = "Make sure you have protoc version 3.0 or higher.\n\
     Version 25.0+ is recommended for current protobuf runtimes.";

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("protoc compiler not found!\n{}", INSTALL_GUIDANCE)]
    CompilerNotFound,

    #[error(
        "Failed to compile {}\nCommand: {}\nError: {}\n\n{}",
        .schema.display(),
        .command,
        .stderr,
        VERSION_HINT
    )]
    CompileFailed {
        schema: PathBuf,
        command: String,
        stderr: String,
    },

    #[error("packaging hand-off failed ({status})\nCommand: {command}\nError: {stderr}")]
    HandoffFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl DriverError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
