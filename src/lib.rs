// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// Library entry point exposing the build driver for the binary and integration tests.

pub mod compiler;
pub mod config;
pub mod domain;
pub mod driver;
pub mod error;
pub mod filesystem;
pub mod runner;
pub mod telemetry;
