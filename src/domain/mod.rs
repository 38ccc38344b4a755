// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// Domain types shared by the compiler wrapper and the build driver.

pub mod compiler;
pub mod schema;
