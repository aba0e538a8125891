//! Envelope decryption pipeline
//!
//! `envelope` parses the stored record, `key_derivation` rebuilds the
//! PBKDF2 key from the envelope's secret material, and `decryptor` performs
//! AES-256-GCM decryption with a detached tag.

pub mod decryptor;
pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_support;

pub use decryptor::{open, Decryptor};
pub use envelope::{
    parse, EncryptedEnvelope, EnvelopeFormat, IterationSource, KdfParams, LengthPolicy, Prf,
    TagLayout, LEGACY_ITERATIONS, NONCE_SIZE, TAG_SIZE,
};
pub use key_derivation::{assemble_password, derive_key, DerivedKey, KEY_SIZE};
pub use secure_memory::{SecureBytes, SecureString};
pub use summary::{inspect, EnvelopeSummary};
