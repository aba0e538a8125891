//! Path management for NetNode
//!
//! Provides XDG-compliant path resolution for settings and the default
//! envelope input/output files.
//!
//! ## Path Resolution Order
//!
//! 1. `NETNODE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/netnode` or `~/.config/netnode`
//! 3. Windows: `%APPDATA%\netnode`

use std::path::PathBuf;

use crate::error::NetNodeError;

/// Manages all paths used by NetNode
#[derive(Debug, Clone)]
pub struct NetNodePaths {
    /// Base directory for all NetNode data
    base_dir: PathBuf,
}

impl NetNodePaths {
    /// Create a new NetNodePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, NetNodeError> {
        let base_dir = if let Ok(custom) = std::env::var("NETNODE_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create NetNodePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/netnode/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Default encrypted envelope location
    pub fn envelope_file(&self) -> PathBuf {
        self.base_dir.join("encrypted_data.json")
    }

    /// Default location for decrypted output
    pub fn decrypted_file(&self) -> PathBuf {
        self.base_dir.join("decrypted_data.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), NetNodeError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| NetNodeError::Io(format!("Failed to create base directory: {}", e)))
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, NetNodeError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                NetNodeError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("netnode"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, NetNodeError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| NetNodeError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("netnode"))
}
