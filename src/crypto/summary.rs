//! Envelope inspection without decryption
//!
//! Reports the shape of an envelope (lengths, KDF cost, layout) so an
//! operator can tell which producer wrote it. Secret-material values are
//! never included, only the names of the fields they came from.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::ParseError;

use super::envelope::{
    parse_object, EnvelopeFormat, IterationSource, Prf, TagLayout, TAG_SIZE,
};

const DATE_FIELD: &str = "date_string";
const DATE_FORMATS: [&str; 2] = ["%Y%m%d", "%Y-%m-%d"];

/// Non-secret description of a parsed envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeSummary {
    pub salt_len: usize,
    pub nonce_len: usize,
    /// Ciphertext length without an appended tag
    pub ciphertext_len: usize,
    pub tag_layout: TagLayout,
    pub tag_len: usize,
    pub iterations: u32,
    pub iteration_source: IterationSource,
    pub prf: Prf,
    pub secret_fields: Vec<String>,
    pub expected_plaintext_length: Option<usize>,
    /// Date parsed from the `date_string` token, when it holds one
    pub issued_on: Option<NaiveDate>,
}

/// Parse an envelope and describe it
pub fn inspect(raw: &str, format: &EnvelopeFormat) -> Result<EnvelopeSummary, ParseError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| ParseError::InvalidJson("expected a JSON object".to_string()))?;

    let envelope = parse_object(obj, format)?;
    let issued_on = obj
        .get(DATE_FIELD)
        .and_then(Value::as_str)
        .and_then(parse_date_token);

    Ok(EnvelopeSummary {
        salt_len: envelope.salt.len(),
        nonce_len: envelope.nonce.len(),
        ciphertext_len: envelope.body_len(),
        tag_layout: envelope.tag_layout,
        tag_len: envelope.tag.as_ref().map_or(TAG_SIZE, Vec::len),
        iterations: envelope.kdf.iterations,
        iteration_source: envelope.kdf.source,
        prf: envelope.kdf.prf,
        secret_fields: format.secret_fields.clone(),
        expected_plaintext_length: envelope.expected_plaintext_length,
        issued_on,
    })
}

/// Interpret a producer date token (`20240101` or `2024-01-01`)
pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token.trim(), fmt).ok())
}
