//! `build` command: one pass, optionally followed by watch mode.

use anyhow::{Result, bail};

use crate::{
    config::SpriteConfig,
    pipeline::{BuildReport, BuildSession, watch},
    utils::plural::plural_count,
};

/// Build once. With `watch`, keep rebuilding until Ctrl+C.
///
/// A failed first pass still enters watch mode so the problem can be fixed
/// in place.
pub fn build_sprites(config: SpriteConfig, watch: bool) -> Result<()> {
    let session = BuildSession::new(config);
    let first = session.run().and_then(check_report);

    if !watch {
        return first;
    }
    if let Err(e) = &first {
        crate::logger::status_error("build failed", &format!("{e:#}"));
    }
    watch::run(&session, None)
}

/// Turn collected write errors into a command failure.
pub fn check_report(report: BuildReport) -> Result<()> {
    if report.is_success() {
        return Ok(());
    }
    for error in &report.write_errors {
        crate::debug!("build"; "{:?}", error);
    }
    bail!(
        "{} could not be written",
        plural_count(report.write_errors.len(), "output")
    )
}
