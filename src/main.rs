// Protobind is open-source under the Apache License 2.0; see LICENSE for usage and contributions.
// This binary reads configuration from the environment and generates protobuf bindings before packaging.

use anyhow::Result;
use protobind::config::DriverConfig;
use protobind::driver::Driver;
use protobind::telemetry;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let cfg = DriverConfig::from_env()?;

    tracing::info!(
        build_root = %cfg.build_root.display(),
        package = %cfg.package_dir.display(),
        version = env!("CARGO_PKG_VERSION"),
        "starting protobind"
    );

    let report = Driver::local(cfg).run()?;

    tracing::info!(
        compiled = report.compiled.len(),
        artifacts = report.artifacts().len(),
        handed_off = report.handed_off,
        "build finished"
    );

    Ok(())
}
