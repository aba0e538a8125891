//! YAML Export functionality
//!
//! Exports a profile bundle to YAML, the format Clash-family clients read.

use crate::error::{NetNodeError, NetNodeResult};
use crate::export::json::ProfileExport;
use crate::profiles::ProfileBundle;
use std::io::Write;

/// Export a profile bundle to YAML format
pub fn export_bundle_yaml<W: Write>(bundle: &ProfileBundle, writer: &mut W) -> NetNodeResult<()> {
    let export = ProfileExport::new(bundle);

    writeln!(writer, "# NetNode Profile Export")
        .map_err(|e| NetNodeError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| NetNodeError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| NetNodeError::Export(e.to_string()))?;
    writeln!(writer, "#").map_err(|e| NetNodeError::Export(e.to_string()))?;
    writeln!(writer, "# Contains live proxy credentials. Keep it private.")
        .map_err(|e| NetNodeError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| NetNodeError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| NetNodeError::Export(e.to_string()))?;

    Ok(())
}

/// Read a bundle back from a YAML export
pub fn import_from_yaml(yaml_str: &str) -> NetNodeResult<ProfileBundle> {
    let export: ProfileExport =
        serde_yaml::from_str(yaml_str).map_err(|e| NetNodeError::Export(e.to_string()))?;
    Ok(export.profiles)
}
