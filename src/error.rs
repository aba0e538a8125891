//! Error types for NetNode
//!
//! Two layers live here. `ParseError` and `DecryptError` describe failures
//! of the envelope pipeline and are classified into four `ErrorKind`s so a
//! caller can decide whether to re-prompt for a secret, discard the input,
//! or treat the failure as a bug. `NetNodeError` wraps them together with
//! the I/O, configuration and profile errors of the surrounding application.
//!
//! None of these errors ever carry key material, passwords or plaintext.

use thiserror::Error;

/// Failure classification shared by every pipeline error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing/invalid field, bad base64, wrong nonce or tag length
    MalformedEnvelope,
    /// Tag verification failed: wrong secret, wrong KDF parameters or tampered data
    AuthenticationFailed,
    /// The cipher succeeded but the plaintext is not UTF-8
    DecodingFailed,
    /// A programmer error caught before the cipher was invoked
    InternalMisuse,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MalformedEnvelope => "malformed envelope",
            Self::AuthenticationFailed => "authentication failed",
            Self::DecodingFailed => "decoding failed",
            Self::InternalMisuse => "internal misuse",
        };
        f.write_str(name)
    }
}

/// Pipeline stage at which a decryption attempt stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptStage {
    Parse,
    KeyDerivation,
    Cipher,
    LengthNormalization,
    TextDecoding,
}

/// Errors produced while parsing an envelope document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The document is not a JSON object
    #[error("Envelope is not valid JSON: {0}")]
    InvalidJson(String),

    /// A required field is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A base64 field could not be decoded
    #[error("Invalid base64 encoding in field: {0}")]
    InvalidEncoding(String),

    /// A binary field decoded to an empty buffer
    #[error("Field must not be empty: {0}")]
    EmptyField(String),

    /// A binary field has the wrong size
    #[error("Invalid length for field '{field}': expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// The iteration count is zero, negative or out of range
    #[error("Invalid KDF iteration count: {0}")]
    InvalidIterations(i64),

    /// A metadata field has the wrong JSON type or an unsupported value
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Two aliases of the same field disagree
    #[error("Ambiguous envelope: fields '{first}' and '{second}' are both present and differ")]
    AmbiguousField { first: String, second: String },
}

impl ParseError {
    /// Name of the envelope field involved, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidJson(_) | Self::InvalidIterations(_) => None,
            Self::MissingField(field)
            | Self::InvalidEncoding(field)
            | Self::EmptyField(field)
            | Self::InvalidLength { field, .. }
            | Self::InvalidValue { field, .. } => Some(field),
            Self::AmbiguousField { first, .. } => Some(first),
        }
    }
}

/// Errors produced by a decryption attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecryptError {
    /// The envelope was rejected before decryption
    #[error("Malformed envelope: {0}")]
    Malformed(#[from] ParseError),

    /// The authentication tag did not verify
    #[error("Decryption failed: authentication tag mismatch (wrong secret or corrupted data)")]
    AuthenticationFailed,

    /// The plaintext length override exceeds the decrypted output
    #[error("Declared plaintext length {expected} exceeds decrypted length {actual}")]
    LengthOverrun { expected: usize, actual: usize },

    /// The decrypted bytes are not UTF-8
    #[error("Decrypted data is not valid UTF-8 (valid up to byte {valid_up_to})")]
    DecodingFailed { valid_up_to: usize },

    /// Key derivation or cipher setup was handed inconsistent inputs
    #[error("Internal cipher misuse: {0}")]
    InternalMisuse(String),
}

impl DecryptError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed(_) | Self::LengthOverrun { .. } => ErrorKind::MalformedEnvelope,
            Self::AuthenticationFailed => ErrorKind::AuthenticationFailed,
            Self::DecodingFailed { .. } => ErrorKind::DecodingFailed,
            Self::InternalMisuse(_) => ErrorKind::InternalMisuse,
        }
    }

    /// Stage at which the attempt stopped
    pub fn stage(&self) -> DecryptStage {
        match self {
            Self::Malformed(_) => DecryptStage::Parse,
            Self::AuthenticationFailed => DecryptStage::Cipher,
            Self::LengthOverrun { .. } => DecryptStage::LengthNormalization,
            Self::DecodingFailed { .. } => DecryptStage::TextDecoding,
            Self::InternalMisuse(_) => DecryptStage::Cipher,
        }
    }

    /// Whether asking the user for the secret again could help
    pub fn is_retryable_with_new_secret(&self) -> bool {
        self.kind() == ErrorKind::AuthenticationFailed
    }
}

/// The main error type for NetNode operations
#[derive(Error, Debug)]
pub enum NetNodeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Profile document errors
    #[error("Profile error: {0}")]
    Profile(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Envelope parsing errors
    #[error(transparent)]
    Envelope(#[from] ParseError),

    /// Decryption errors
    #[error(transparent)]
    Decrypt(#[from] DecryptError),
}

impl NetNodeError {
    /// Pipeline classification, if this error came out of the pipeline
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Envelope(_) => Some(ErrorKind::MalformedEnvelope),
            Self::Decrypt(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            Some(ErrorKind::MalformedEnvelope) => 2,
            Some(ErrorKind::AuthenticationFailed) => 3,
            Some(ErrorKind::DecodingFailed) => 4,
            Some(ErrorKind::InternalMisuse) => 70,
            None => 1,
        }
    }
}

impl From<std::io::Error> for NetNodeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for NetNodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for NetNode operations
pub type NetNodeResult<T> = Result<T, NetNodeError>;
