//! NetNode - decryption of password-sealed proxy configuration envelopes
//!
//! A producer seals a JSON configuration with AES-256-GCM under a key
//! stretched by PBKDF2 from secret material stored alongside the
//! ciphertext. This library parses those envelopes, rebuilds the key,
//! verifies the tag and returns the plaintext as UTF-8 text.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `crypto`: Envelope parsing, key derivation and decryption
//! - `error`: Error taxonomy and exit codes
//! - `config`: Configuration and path management
//! - `profiles`: Typed view of the decrypted v2ray/clash/sing-box bundle
//! - `storage`: File reads and atomic writes
//! - `export`: JSON and YAML export of profile bundles
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `netnode` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use netnode::crypto::{open, EnvelopeFormat};
//!
//! let raw = std::fs::read_to_string("encrypted_data.json")?;
//! let plaintext = open(&raw, &EnvelopeFormat::standard())?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod profiles;
pub mod storage;

pub use error::{DecryptError, ErrorKind, NetNodeError, NetNodeResult, ParseError};
