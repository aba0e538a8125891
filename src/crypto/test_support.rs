//! Reference sealer used by the unit tests
//!
//! Mirrors the producer: PBKDF2-HMAC-SHA256 over the concatenated secret
//! fields, then AES-256-GCM with an empty AAD.

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};
use pbkdf2::pbkdf2_hmac;
use serde_json::{json, Value};
use sha2::Sha256;

use super::envelope::TagLayout;

pub(crate) struct Seal<'a> {
    pub plaintext: &'a [u8],
    pub salt: &'a [u8],
    pub nonce: [u8; 12],
    pub iterations: u32,
    pub date_string: &'a str,
    pub random_num: &'a str,
    pub layout: TagLayout,
}

impl Default for Seal<'_> {
    fn default() -> Self {
        Self {
            plaintext: br#"{"v2ray":{"add":"example.com","port":443}}"#,
            salt: &[7u8; 16],
            nonce: [3u8; 12],
            iterations: 1000,
            date_string: "20240101",
            random_num: "4821",
            layout: TagLayout::Detached,
        }
    }
}

impl Seal<'_> {
    pub fn to_json(&self) -> Value {
        let password = format!("{}{}", self.date_string, self.random_num);
        let mut key = [0u8; 32];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), self.salt, self.iterations, &mut key);

        let cipher = Aes256Gcm::new_from_slice(&key).unwrap();
        let mut buffer = self.plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(&self.nonce), b"", &mut buffer)
            .unwrap();

        let mut envelope = json!({
            "salt": STANDARD.encode(self.salt),
            "iv": STANDARD.encode(self.nonce),
            "salt_length": self.salt.len(),
            "date_string": self.date_string,
            "random_num": self.random_num,
            "original_data_length": self.plaintext.len(),
            "iterations": self.iterations,
        });
        match self.layout {
            TagLayout::Detached => {
                envelope["ciphertext"] = json!(STANDARD.encode(&buffer));
                envelope["tag"] = json!(STANDARD.encode(tag));
            }
            TagLayout::Appended => {
                buffer.extend_from_slice(&tag);
                envelope["ciphertext"] = json!(STANDARD.encode(&buffer));
            }
        }
        envelope
    }

    pub fn to_text(&self) -> String {
        self.to_json().to_string()
    }
}
