//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the decryption pipeline.

pub mod config;
pub mod decrypt;
pub mod inspect;
pub mod profiles;

pub use config::{handle_config_command, ConfigArgs};
pub use decrypt::{handle_decrypt_command, DecryptArgs};
pub use inspect::{handle_inspect_command, InspectArgs};
pub use profiles::{handle_profiles_command, ProfilesCommands};

use crate::config::Settings;
use crate::crypto::EnvelopeFormat;
use crate::error::NetNodeResult;

/// Envelope format from settings, with an optional preset override
///
/// An override replaces the preset but keeps per-field settings.
pub fn resolve_format(settings: &Settings, preset: Option<&str>) -> NetNodeResult<EnvelopeFormat> {
    match preset {
        Some(name) => {
            let mut envelope = settings.envelope.clone();
            envelope.preset = name.to_string();
            envelope.format()
        }
        None => settings.envelope_format(),
    }
}
