//! Export module for NetNode
//!
//! Writes decrypted profile bundles in two formats:
//! - JSON: machine-readable, with export metadata
//! - YAML: for Clash-family clients and human review

pub mod json;
pub mod yaml;

pub use json::{export_bundle_json, ProfileExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_bundle_yaml, import_from_yaml};

/// Output format for `profiles export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Yaml,
}
