//! tests/common/mod.rs
//! Reference sealer shared by the integration tests

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};
use netnode::crypto::TagLayout;
use pbkdf2::pbkdf2_hmac;
use serde_json::{json, Value};
use sha2::Sha256;

/// Fast iteration count for tests that don't care about KDF cost
#[allow(dead_code)] // Used across multiple test files
pub const TEST_ITERATIONS: u32 = 2;

#[allow(dead_code)] // Used across multiple test files
pub const TEST_PLAINTEXT: &str = r#"{"v2ray":{"add":"example.com","port":443}}"#;

#[allow(dead_code)] // Used across multiple test files
pub const TEST_SECRETS: &[(&str, &str)] = &[("date_string", "20240101"), ("random_num", "4821")];

/// Seal `plaintext` the way the producer does
///
/// The password is the secret values concatenated in order. Each secret is
/// also written into the envelope under its name. `iterations` is always
/// written as a number, even when it is also a secret field.
pub fn seal(
    plaintext: &[u8],
    salt: &[u8],
    nonce: &[u8; 12],
    iterations: u32,
    secrets: &[(&str, &str)],
    layout: TagLayout,
) -> Value {
    let password: String = secrets.iter().map(|(_, value)| *value).collect();
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);

    let cipher = Aes256Gcm::new_from_slice(&key).unwrap();
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(nonce), b"", &mut buffer)
        .unwrap();

    let mut envelope = json!({
        "salt": STANDARD.encode(salt),
        "iv": STANDARD.encode(nonce),
        "salt_length": salt.len(),
        "original_data_length": plaintext.len(),
    });
    for (name, value) in secrets {
        envelope[*name] = json!(value);
    }
    envelope["iterations"] = json!(iterations);

    match layout {
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

/// Seal the default test plaintext with the default secrets
#[allow(dead_code)] // Used across multiple test files
pub fn seal_default(layout: TagLayout) -> Value {
    seal(
        TEST_PLAINTEXT.as_bytes(),
        &[7u8; 16],
        &[3u8; 12],
        TEST_ITERATIONS,
        TEST_SECRETS,
        layout,
    )
}

/// Decode a base64 field of an envelope
#[allow(dead_code)] // Used across multiple test files
pub fn field_bytes(envelope: &Value, field: &str) -> Vec<u8> {
    STANDARD
        .decode(envelope[field].as_str().unwrap())
        .unwrap()
}

/// Replace a base64 field of an envelope
#[allow(dead_code)] // Used across multiple test files
pub fn set_field_bytes(envelope: &mut Value, field: &str, bytes: &[u8]) {
    envelope[field] = json!(STANDARD.encode(bytes));
}
