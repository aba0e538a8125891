//! Configuration module for NetNode
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Envelope format selection

pub mod paths;
pub mod settings;

pub use paths::NetNodePaths;
pub use settings::{EnvelopeSettings, Settings};
