//! Key derivation using PBKDF2
//!
//! The password is never typed by a user. It is rebuilt from the envelope's
//! secret-material components, concatenated in the order the producer used,
//! and stretched with PBKDF2 over the envelope's salt into a 256-bit key.

use pbkdf2::pbkdf2_hmac;
use sha2::{Sha256, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::DecryptError;

use super::envelope::{KdfParams, Prf};
use super::SecureString;

/// Length of the derived AES-256 key in bytes
pub const KEY_SIZE: usize = 32;

/// A derived encryption key, wiped on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

// Never print key bytes
impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Concatenate secret-material components into the KDF password
pub fn assemble_password(components: &[SecureString]) -> SecureString {
    let mut password = SecureString::default();
    for component in components {
        password.push_secret(component);
    }
    password
}

/// Derive an AES-256 key from a password and salt
pub fn derive_key(
    password: &SecureString,
    salt: &[u8],
    params: &KdfParams,
) -> Result<DerivedKey, DecryptError> {
    if params.iterations == 0 {
        return Err(DecryptError::InternalMisuse(
            "PBKDF2 iteration count must be at least 1".to_string(),
        ));
    }
    if salt.is_empty() {
        return Err(DecryptError::InternalMisuse(
            "PBKDF2 salt must not be empty".to_string(),
        ));
    }

    let mut key = [0u8; KEY_SIZE];
    match params.prf {
        Prf::HmacSha256 => {
            pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, params.iterations, &mut key)
        }
        Prf::HmacSha512 => {
            pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, params.iterations, &mut key)
        }
    }

    tracing::debug!(
        iterations = params.iterations,
        prf = %params.prf,
        salt_len = salt.len(),
        "derived key"
    );

    let derived = DerivedKey { key };
    key.zeroize();
    Ok(derived)
}
