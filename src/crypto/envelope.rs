//! Envelope codec
//!
//! Parses the JSON record written by the configuration producer into typed
//! binary buffers. Every base64 field is decoded on its own so errors name
//! the offending field. Which producer variant wrote the record (tag layout,
//! secret-material order, iteration fallback, length metadata) is never
//! guessed: it is selected up front through an [`EnvelopeFormat`].
//!
//! Parsing is pure. It does not read files or touch the network.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;

use super::SecureString;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Iteration count used by producers that did not record one
pub const LEGACY_ITERATIONS: u32 = 100_000;

const SALT_FIELD: &str = "salt";
const NONCE_FIELDS: [&str; 2] = ["iv", "nonce"];
const CIPHERTEXT_FIELD: &str = "ciphertext";
const TAG_FIELDS: [&str; 2] = ["tag", "mac"];
const ITERATIONS_FIELD: &str = "iterations";
const LENGTH_FIELD: &str = "original_data_length";
const SALT_LENGTH_FIELD: &str = "salt_length";
const PRF_FIELD: &str = "prf";

/// Where the authentication tag is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TagLayout {
    /// Separate `tag`/`mac` field
    #[default]
    Detached,
    /// Last 16 bytes of `ciphertext`
    Appended,
}

impl std::fmt::Display for TagLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detached => write!(f, "detached"),
            Self::Appended => write!(f, "appended"),
        }
    }
}

/// How `original_data_length` is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LengthPolicy {
    /// Never read the field; trust the cipher's output length
    Ignore,
    /// Use the field when present
    #[default]
    Optional,
    /// The field must be present
    Required,
}

/// Pseudorandom function used inside PBKDF2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Prf {
    #[default]
    #[serde(rename = "sha256")]
    HmacSha256,
    #[serde(rename = "sha512")]
    HmacSha512,
}

impl Prf {
    /// Parse the envelope's `prf` field
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sha256" | "hmac-sha256" | "sha-256" => Some(Self::HmacSha256),
            "sha512" | "hmac-sha512" | "sha-512" => Some(Self::HmacSha512),
            _ => None,
        }
    }
}

impl std::fmt::Display for Prf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HmacSha256 => write!(f, "HMAC-SHA256"),
            Self::HmacSha512 => write!(f, "HMAC-SHA512"),
        }
    }
}

/// Where the iteration count came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationSource {
    /// Read from the envelope's `iterations` field
    Envelope,
    /// Taken from the format's explicit legacy fallback
    LegacyFallback,
}

/// Key derivation parameters carried by one envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: u32,
    pub prf: Prf,
    pub source: IterationSource,
}

/// Selects which producer variant an envelope was written by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeFormat {
    /// Where the tag lives
    pub tag_layout: TagLayout,
    /// Secret-material fields, in password concatenation order
    pub secret_fields: Vec<String>,
    /// Treatment of `original_data_length`
    pub length_policy: LengthPolicy,
    /// Iteration count to assume when the envelope has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_iterations: Option<u32>,
    /// PRF when the envelope does not name one
    #[serde(default)]
    pub default_prf: Prf,
}

impl Default for EnvelopeFormat {
    fn default() -> Self {
        Self::standard()
    }
}

impl EnvelopeFormat {
    /// Detached tag, `date_string` + `random_num`, iterations from the envelope
    pub fn standard() -> Self {
        Self {
            tag_layout: TagLayout::Detached,
            secret_fields: vec!["date_string".to_string(), "random_num".to_string()],
            length_policy: LengthPolicy::Optional,
            legacy_iterations: None,
            default_prf: Prf::HmacSha256,
        }
    }

    /// Like [`standard`](Self::standard) with the tag appended to the ciphertext
    pub fn appended_tag() -> Self {
        Self {
            tag_layout: TagLayout::Appended,
            ..Self::standard()
        }
    }

    /// Records written for the native-library reader: no iteration field,
    /// fixed 100000 rounds, and a mandatory plaintext length
    pub fn legacy_native() -> Self {
        Self {
            length_policy: LengthPolicy::Required,
            legacy_iterations: Some(LEGACY_ITERATIONS),
            ..Self::standard()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::standard()),
            "appended" | "appended-tag" => Some(Self::appended_tag()),
            "legacy" | "legacy-native" => Some(Self::legacy_native()),
            _ => None,
        }
    }

    /// Replace the secret-material fields and their order
    pub fn with_secret_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// A parsed, validated envelope
///
/// Built once per request by [`parse`] and consumed by one decryption
/// attempt.
#[derive(Debug, Clone)]
pub struct EncryptedEnvelope {
    pub salt: Vec<u8>,
    pub nonce: Vec<u8>,
    /// Ciphertext; for [`TagLayout::Appended`] this still ends with the tag
    pub ciphertext: Vec<u8>,
    /// Detached tag; `None` when the tag is appended
    pub tag: Option<Vec<u8>>,
    pub tag_layout: TagLayout,
    pub kdf: KdfParams,
    /// Password components in concatenation order
    pub secret_material: Vec<SecureString>,
    pub expected_plaintext_length: Option<usize>,
}

impl EncryptedEnvelope {
    /// Length of the ciphertext without any appended tag
    pub fn body_len(&self) -> usize {
        match self.tag_layout {
            TagLayout::Detached => self.ciphertext.len(),
            TagLayout::Appended => self.ciphertext.len().saturating_sub(TAG_SIZE),
        }
    }
}

/// Parse an envelope document
pub fn parse(raw: &str, format: &EnvelopeFormat) -> Result<EncryptedEnvelope, ParseError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| ParseError::InvalidJson("expected a JSON object".to_string()))?;

    parse_object(obj, format)
}

/// Parse an envelope that has already been read as JSON
pub fn parse_object(
    obj: &Map<String, Value>,
    format: &EnvelopeFormat,
) -> Result<EncryptedEnvelope, ParseError> {
    let salt = decode_field(SALT_FIELD, required(obj, SALT_FIELD)?)?;
    if let Some(value) = obj.get(SALT_LENGTH_FIELD) {
        let declared = read_length(SALT_LENGTH_FIELD, value)?;
        if declared != salt.len() {
            return Err(ParseError::InvalidLength {
                field: SALT_FIELD.to_string(),
                expected: declared,
                actual: salt.len(),
            });
        }
    }

    let (nonce_field, nonce_value) = aliased(obj, &NONCE_FIELDS)?
        .ok_or_else(|| ParseError::MissingField(NONCE_FIELDS[0].to_string()))?;
    let nonce = decode_field(nonce_field, nonce_value)?;
    expect_len(nonce_field, &nonce, NONCE_SIZE)?;

    let ciphertext = decode_field(CIPHERTEXT_FIELD, required(obj, CIPHERTEXT_FIELD)?)?;

    let tag = match format.tag_layout {
        TagLayout::Detached => {
            let (tag_field, tag_value) = aliased(obj, &TAG_FIELDS)?
                .ok_or_else(|| ParseError::MissingField(TAG_FIELDS[0].to_string()))?;
            let tag = decode_field(tag_field, tag_value)?;
            expect_len(tag_field, &tag, TAG_SIZE)?;
            Some(tag)
        }
        TagLayout::Appended => {
            if let Some((tag_field, _)) = aliased(obj, &TAG_FIELDS)? {
                return Err(ParseError::InvalidValue {
                    field: tag_field.to_string(),
                    reason: "format expects the tag appended to the ciphertext".to_string(),
                });
            }
            if ciphertext.len() < TAG_SIZE {
                return Err(ParseError::InvalidLength {
                    field: CIPHERTEXT_FIELD.to_string(),
                    expected: TAG_SIZE,
                    actual: ciphertext.len(),
                });
            }
            None
        }
    };

    let kdf = read_kdf_params(obj, format)?;
    let secret_material = read_secret_material(obj, &format.secret_fields)?;

    let expected_plaintext_length = match format.length_policy {
        LengthPolicy::Ignore => None,
        LengthPolicy::Optional => obj
            .get(LENGTH_FIELD)
            .map(|v| read_length(LENGTH_FIELD, v))
            .transpose()?,
        LengthPolicy::Required => Some(read_length(LENGTH_FIELD, required(obj, LENGTH_FIELD)?)?),
    };

    tracing::debug!(
        salt_len = salt.len(),
        ciphertext_len = ciphertext.len(),
        tag_layout = %format.tag_layout,
        iterations = kdf.iterations,
        prf = %kdf.prf,
        secret_components = secret_material.len(),
        "parsed envelope"
    );

    Ok(EncryptedEnvelope {
        salt,
        nonce,
        ciphertext,
        tag,
        tag_layout: format.tag_layout,
        kdf,
        secret_material,
        expected_plaintext_length,
    })
}

fn read_kdf_params(
    obj: &Map<String, Value>,
    format: &EnvelopeFormat,
) -> Result<KdfParams, ParseError> {
    let (iterations, source) = match obj.get(ITERATIONS_FIELD) {
        Some(value) => (read_integer(ITERATIONS_FIELD, value)?, IterationSource::Envelope),
        None => match format.legacy_iterations {
            Some(fallback) => {
                tracing::warn!(
                    iterations = fallback,
                    "envelope has no iteration count, using legacy fallback"
                );
                (i64::from(fallback), IterationSource::LegacyFallback)
            }
            None => return Err(ParseError::MissingField(ITERATIONS_FIELD.to_string())),
        },
    };
    let iterations = u32::try_from(iterations)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(ParseError::InvalidIterations(iterations))?;

    let prf = match obj.get(PRF_FIELD) {
        Some(Value::String(name)) => Prf::from_name(name).ok_or_else(|| ParseError::InvalidValue {
            field: PRF_FIELD.to_string(),
            reason: format!("unsupported PRF '{}'", name),
        })?,
        Some(_) => {
            return Err(ParseError::InvalidValue {
                field: PRF_FIELD.to_string(),
                reason: "expected a string".to_string(),
            })
        }
        None => format.default_prf,
    };

    Ok(KdfParams {
        iterations,
        prf,
        source,
    })
}

fn read_secret_material(
    obj: &Map<String, Value>,
    fields: &[String],
) -> Result<Vec<SecureString>, ParseError> {
    if fields.is_empty() {
        return Err(ParseError::InvalidValue {
            field: "secret_fields".to_string(),
            reason: "format names no secret-material fields".to_string(),
        });
    }

    fields
        .iter()
        .map(|field| {
            let component = match required(obj, field)? {
                Value::String(s) => SecureString::new(s.as_str()),
                // Producers occasionally emit numeric tokens unquoted
                Value::Number(n) if n.is_i64() || n.is_u64() => SecureString::new(n.to_string()),
                _ => {
                    return Err(ParseError::InvalidValue {
                        field: field.clone(),
                        reason: "expected a string or integer".to_string(),
                    })
                }
            };
            if component.is_empty() {
                return Err(ParseError::EmptyField(field.clone()));
            }
            Ok(component)
        })
        .collect()
}

fn required<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value, ParseError> {
    match obj.get(field) {
        Some(Value::Null) | None => Err(ParseError::MissingField(field.to_string())),
        Some(value) => Ok(value),
    }
}

/// First present alias of a field; two aliases with different values are rejected
fn aliased<'a>(
    obj: &'a Map<String, Value>,
    names: &[&'static str],
) -> Result<Option<(&'static str, &'a Value)>, ParseError> {
    let mut found: Option<(&'static str, &'a Value)> = None;
    for &name in names {
        let Some(value) = obj.get(name).filter(|v| !v.is_null()) else {
            continue;
        };
        match found {
            None => found = Some((name, value)),
            Some((first, existing)) if existing != value => {
                return Err(ParseError::AmbiguousField {
                    first: first.to_string(),
                    second: name.to_string(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(found)
}

fn decode_field(field: &str, value: &Value) -> Result<Vec<u8>, ParseError> {
    let text = value.as_str().ok_or_else(|| ParseError::InvalidValue {
        field: field.to_string(),
        reason: "expected a base64 string".to_string(),
    })?;
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|_| ParseError::InvalidEncoding(field.to_string()))?;
    if bytes.is_empty() {
        return Err(ParseError::EmptyField(field.to_string()));
    }
    Ok(bytes)
}

fn expect_len(field: &str, bytes: &[u8], expected: usize) -> Result<(), ParseError> {
    if bytes.len() != expected {
        return Err(ParseError::InvalidLength {
            field: field.to_string(),
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

fn read_integer(field: &str, value: &Value) -> Result<i64, ParseError> {
    value.as_i64().ok_or_else(|| ParseError::InvalidValue {
        field: field.to_string(),
        reason: "expected an integer".to_string(),
    })
}

fn read_length(field: &str, value: &Value) -> Result<usize, ParseError> {
    let n = read_integer(field, value)?;
    usize::try_from(n).map_err(|_| ParseError::InvalidValue {
        field: field.to_string(),
        reason: format!("length must not be negative, got {}", n),
    })
}
