//! JSON Export functionality
//!
//! Wraps a decrypted profile bundle with export metadata.

use crate::error::{NetNodeError, NetNodeResult};
use crate::profiles::ProfileBundle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Profile bundle export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Number of profile sections present
    pub profile_count: usize,

    /// The profiles themselves
    pub profiles: ProfileBundle,
}

impl ProfileExport {
    /// Snapshot a bundle for export
    pub fn new(bundle: &ProfileBundle) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            profile_count: bundle.summaries().len(),
            profiles: bundle.clone(),
        }
    }
}

/// Export a profile bundle to JSON format
pub fn export_bundle_json<W: Write>(
    bundle: &ProfileBundle,
    writer: &mut W,
    pretty: bool,
) -> NetNodeResult<()> {
    let export = ProfileExport::new(bundle);

    let result = if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    };
    result.map_err(|e| NetNodeError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| NetNodeError::Export(e.to_string()))?;
    Ok(())
}
