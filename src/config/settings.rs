//! User settings for NetNode
//!
//! Selects the envelope format the producer writes (preset plus optional
//! per-field overrides), the default log level, and output preferences.

use serde::{Deserialize, Serialize};

use super::paths::NetNodePaths;
use crate::crypto::{EnvelopeFormat, LengthPolicy, Prf, TagLayout};
use crate::error::NetNodeError;

/// Envelope format selection
///
/// `preset` names a built-in [`EnvelopeFormat`]; any field set here
/// overrides the preset's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeSettings {
    /// Preset name: `standard`, `appended` or `legacy`
    #[serde(default = "default_preset")]
    pub preset: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_layout: Option<TagLayout>,

    /// Secret-material field names, in concatenation order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_fields: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_policy: Option<LengthPolicy>,

    /// Iteration count assumed for envelopes that carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_iterations: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_prf: Option<Prf>,
}

impl Default for EnvelopeSettings {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            tag_layout: None,
            secret_fields: None,
            length_policy: None,
            legacy_iterations: None,
            default_prf: None,
        }
    }
}

impl EnvelopeSettings {
    /// Build the envelope format these settings describe
    pub fn format(&self) -> Result<EnvelopeFormat, NetNodeError> {
        let mut format = EnvelopeFormat::preset(&self.preset).ok_or_else(|| {
            NetNodeError::Config(format!("Unknown envelope preset: {}", self.preset))
        })?;

        if let Some(layout) = self.tag_layout {
            format.tag_layout = layout;
        }
        if let Some(ref fields) = self.secret_fields {
            if fields.is_empty() {
                return Err(NetNodeError::Config(
                    "secret_fields must name at least one field".into(),
                ));
            }
            format.secret_fields = fields.clone();
        }
        if let Some(policy) = self.length_policy {
            format.length_policy = policy;
        }
        if let Some(iterations) = self.legacy_iterations {
            if iterations == 0 {
                return Err(NetNodeError::Config(
                    "legacy_iterations must be greater than zero".into(),
                ));
            }
            format.legacy_iterations = Some(iterations);
        }
        if let Some(prf) = self.default_prf {
            format.default_prf = prf;
        }

        Ok(format)
    }
}

/// User settings for NetNode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Envelope format selection
    #[serde(default)]
    pub envelope: EnvelopeSettings,

    /// Default tracing filter (overridden by `NETNODE_LOG`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pretty-print decrypted JSON
    #[serde(default = "default_pretty_output")]
    pub pretty_output: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_preset() -> String {
    "standard".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_pretty_output() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            envelope: EnvelopeSettings::default(),
            log_level: default_log_level(),
            pretty_output: default_pretty_output(),
        }
    }
}

impl Settings {
    /// Envelope format selected by these settings
    pub fn envelope_format(&self) -> Result<EnvelopeFormat, NetNodeError> {
        self.envelope.format()
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &NetNodePaths) -> Result<Self, NetNodeError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                NetNodeError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                NetNodeError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &NetNodePaths) -> Result<(), NetNodeError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            NetNodeError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            NetNodeError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
