//! AES-256-GCM authenticated decryption
//!
//! A [`Decryptor`] is a stateless value: it holds no keys and no caches, so
//! one instance can be shared freely between threads. Each call rebuilds the
//! password, derives a fresh key, verifies the tag and only then exposes
//! plaintext. No retries happen here; retry policy belongs to the caller.

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce, Tag};
use zeroize::Zeroize;

use crate::error::DecryptError;

use super::envelope::{self, EncryptedEnvelope, EnvelopeFormat, TagLayout, NONCE_SIZE, TAG_SIZE};
use super::key_derivation::{assemble_password, derive_key};
use super::{SecureBytes, SecureString};

/// Decrypts parsed envelopes
#[derive(Debug, Clone, Copy, Default)]
pub struct Decryptor;

impl Decryptor {
    /// Create a new Decryptor
    pub fn new() -> Self {
        Self
    }

    /// Decrypt an envelope to UTF-8 text using its own secret material
    pub fn decrypt(&self, envelope: EncryptedEnvelope) -> Result<String, DecryptError> {
        let plaintext = self.decrypt_bytes(envelope)?;
        into_text(plaintext)
    }

    /// Decrypt an envelope to UTF-8 text with a caller-supplied password
    ///
    /// The envelope's secret material is ignored. Use this when a user is
    /// prompted for the secret after an `AuthenticationFailed`.
    pub fn decrypt_with_password(
        &self,
        envelope: EncryptedEnvelope,
        password: &SecureString,
    ) -> Result<String, DecryptError> {
        let plaintext = self.decrypt_bytes_with_password(envelope, password)?;
        into_text(plaintext)
    }

    /// Decrypt an envelope to raw plaintext bytes using its own secret material
    pub fn decrypt_bytes(&self, envelope: EncryptedEnvelope) -> Result<SecureBytes, DecryptError> {
        let password = assemble_password(&envelope.secret_material);
        self.decrypt_bytes_with_password(envelope, &password)
    }

    /// Decrypt an envelope to raw plaintext bytes with a caller-supplied password
    pub fn decrypt_bytes_with_password(
        &self,
        envelope: EncryptedEnvelope,
        password: &SecureString,
    ) -> Result<SecureBytes, DecryptError> {
        if envelope.nonce.len() != NONCE_SIZE {
            return Err(DecryptError::InternalMisuse(format!(
                "nonce must be {} bytes, got {}",
                NONCE_SIZE,
                envelope.nonce.len()
            )));
        }
        let (body, tag) = split_tag(&envelope)?;

        let key = derive_key(password, &envelope.salt, &envelope.kdf)?;
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|_| DecryptError::InternalMisuse("AES-256 key must be 32 bytes".to_string()))?;
        drop(key);

        let mut buffer = SecureBytes::from(body);
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(&envelope.nonce),
                b"",
                buffer.as_bytes_mut(),
                Tag::from_slice(tag),
            )
            .map_err(|_| {
                tracing::debug!("authentication tag mismatch");
                DecryptError::AuthenticationFailed
            })?;

        if let Some(expected) = envelope.expected_plaintext_length {
            if expected > buffer.len() {
                return Err(DecryptError::LengthOverrun {
                    expected,
                    actual: buffer.len(),
                });
            }
            buffer.truncate(expected);
        }

        tracing::debug!(plaintext_len = buffer.len(), "decrypted envelope");
        Ok(buffer)
    }
}

/// Parse and decrypt an envelope document in one step
pub fn open(raw: &str, format: &EnvelopeFormat) -> Result<String, DecryptError> {
    let envelope = envelope::parse(raw, format)?;
    Decryptor::new().decrypt(envelope)
}

/// Separate ciphertext body and tag according to the envelope's layout
fn split_tag(envelope: &EncryptedEnvelope) -> Result<(&[u8], &[u8]), DecryptError> {
    let (body, tag) = match (envelope.tag_layout, envelope.tag.as_deref()) {
        (TagLayout::Detached, Some(tag)) => (envelope.ciphertext.as_slice(), tag),
        (TagLayout::Detached, None) => {
            return Err(DecryptError::InternalMisuse(
                "detached layout without a tag".to_string(),
            ))
        }
        (TagLayout::Appended, None) => {
            if envelope.ciphertext.len() < TAG_SIZE {
                return Err(DecryptError::InternalMisuse(format!(
                    "appended layout needs at least {} ciphertext bytes, got {}",
                    TAG_SIZE,
                    envelope.ciphertext.len()
                )));
            }
            envelope.ciphertext.split_at(envelope.ciphertext.len() - TAG_SIZE)
        }
        (TagLayout::Appended, Some(_)) => {
            return Err(DecryptError::InternalMisuse(
                "appended layout with a separate tag".to_string(),
            ))
        }
    };

    if tag.len() != TAG_SIZE {
        return Err(DecryptError::InternalMisuse(format!(
            "tag must be {} bytes, got {}",
            TAG_SIZE,
            tag.len()
        )));
    }
    Ok((body, tag))
}

fn into_text(plaintext: SecureBytes) -> Result<String, DecryptError> {
    String::from_utf8(plaintext.into_vec()).map_err(|e| {
        let valid_up_to = e.utf8_error().valid_up_to();
        e.into_bytes().zeroize();
        DecryptError::DecodingFailed { valid_up_to }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::envelope::parse;
    use crate::crypto::test_support::Seal;
    use crate::error::{DecryptStage, ErrorKind};

    const PLAINTEXT: &str = r#"{"v2ray":{"add":"example.com","port":443}}"#;

    fn sealed(seal: &Seal<'_>) -> EncryptedEnvelope {
        let format = match seal.layout {
            TagLayout::Detached => EnvelopeFormat::standard(),
            TagLayout::Appended => EnvelopeFormat::appended_tag(),
        };
        parse(&seal.to_text(), &format).unwrap()
    }

    #[test]
    fn test_decrypt_detached() {
        let envelope = sealed(&Seal::default());
        let text = Decryptor::new().decrypt(envelope).unwrap();
        assert_eq!(text, PLAINTEXT);
    }

    #[test]
    fn test_decrypt_appended() {
        let envelope = sealed(&Seal {
            layout: TagLayout::Appended,
            ..Seal::default()
        });
        let text = Decryptor::new().decrypt(envelope).unwrap();
        assert_eq!(text, PLAINTEXT);
    }

    #[test]
    fn test_open_one_step() {
        let text = open(&Seal::default().to_text(), &EnvelopeFormat::standard()).unwrap();
        assert_eq!(text, PLAINTEXT);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut envelope = sealed(&Seal::default());
        envelope.ciphertext[0] ^= 0x01;
        let err = Decryptor::new().decrypt(envelope).unwrap_err();
        assert_eq!(err, DecryptError::AuthenticationFailed);
        assert_eq!(err.stage(), DecryptStage::Cipher);
    }

    #[test]
    fn test_tampered_tag_fails() {
        let mut envelope = sealed(&Seal::default());
        if let Some(tag) = envelope.tag.as_mut() {
            tag[15] ^= 0x80;
        }
        let err = Decryptor::new().decrypt(envelope).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    }

    #[test]
    fn test_wrong_password_fails() {
        let envelope = sealed(&Seal::default());
        let err = Decryptor::new()
            .decrypt_with_password(envelope, &SecureString::new("48212024010"))
            .unwrap_err();
        assert_eq!(err, DecryptError::AuthenticationFailed);
    }

    #[test]
    fn test_caller_password_matches_envelope_secret() {
        let envelope = sealed(&Seal::default());
        let text = Decryptor::new()
            .decrypt_with_password(envelope, &SecureString::new("202401014821"))
            .unwrap();
        assert_eq!(text, PLAINTEXT);
    }

    #[test]
    fn test_swapped_secret_order_fails() {
        let mut envelope = sealed(&Seal::default());
        envelope.secret_material.reverse();
        let err = Decryptor::new().decrypt(envelope).unwrap_err();
        assert_eq!(err, DecryptError::AuthenticationFailed);
    }

    #[test]
    fn test_wrong_iterations_fail() {
        let mut envelope = sealed(&Seal::default());
        envelope.kdf.iterations += 1;
        let err = Decryptor::new().decrypt(envelope).unwrap_err();
        assert_eq!(err, DecryptError::AuthenticationFailed);
    }

    #[test]
    fn test_length_truncation() {
        let mut envelope = sealed(&Seal::default());
        envelope.expected_plaintext_length = Some(9);
        let bytes = Decryptor::new().decrypt_bytes(envelope).unwrap();
        assert_eq!(bytes.as_bytes(), &PLAINTEXT.as_bytes()[..9]);
    }

    #[test]
    fn test_length_overrun_is_malformed() {
        let mut envelope = sealed(&Seal::default());
        envelope.expected_plaintext_length = Some(PLAINTEXT.len() + 1);
        let err = Decryptor::new().decrypt(envelope).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
        assert_eq!(err.stage(), DecryptStage::LengthNormalization);
    }

    #[test]
    fn test_invalid_utf8_is_decoding_failure() {
        let plaintext = [b'{', 0xff, 0xfe, b'}'];
        let envelope = sealed(&Seal {
            plaintext: &plaintext,
            ..Seal::default()
        });
        let err = Decryptor::new().decrypt(envelope).unwrap_err();
        assert_eq!(err, DecryptError::DecodingFailed { valid_up_to: 1 });
        assert_eq!(err.kind(), ErrorKind::DecodingFailed);
    }

    #[test]
    fn test_bad_nonce_is_misuse_before_cipher() {
        let mut envelope = sealed(&Seal::default());
        envelope.nonce.push(0);
        let err = Decryptor::new().decrypt(envelope).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalMisuse);
    }

    #[test]
    fn test_missing_detached_tag_is_misuse() {
        let mut envelope = sealed(&Seal::default());
        envelope.tag = None;
        let err = Decryptor::new().decrypt(envelope).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalMisuse);
    }

    #[test]
    fn test_short_tag_is_misuse() {
        let mut envelope = sealed(&Seal::default());
        if let Some(tag) = envelope.tag.as_mut() {
            tag.truncate(12);
        }
        let err = Decryptor::new().decrypt(envelope).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalMisuse);
    }

    #[test]
    fn test_concurrent_decryption() {
        let decryptor = Decryptor::new();
        let secrets = ["1111", "2222", "3333", "4444"];

        std::thread::scope(|scope| {
            let handles: Vec<_> = secrets
                .iter()
                .map(|secret| {
                    let envelope = sealed(&Seal {
                        random_num: secret,
                        iterations: 50,
                        ..Seal::default()
                    });
                    scope.spawn(move || decryptor.decrypt(envelope))
                })
                .collect();

            for handle in handles {
                assert_eq!(handle.join().unwrap().unwrap(), PLAINTEXT);
            }
        });
    }

    #[test]
    fn test_errors_do_not_leak_secrets() {
        let mut envelope = sealed(&Seal::default());
        envelope.ciphertext[1] ^= 0x10;
        let message = Decryptor::new().decrypt(envelope).unwrap_err().to_string();
        assert!(!message.contains("4821"));
        assert!(!message.contains("20240101"));
    }
}
