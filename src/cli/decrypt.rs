//! Decrypt CLI command
//!
//! Reads an envelope, decrypts it, and writes the plaintext to a file or
//! stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::Value;

use crate::config::{NetNodePaths, Settings};
use crate::crypto::{parse, Decryptor, EnvelopeFormat, SecureString};
use crate::error::{NetNodeError, NetNodeResult};
use crate::storage::{read_text, write_text_atomic};

/// Arguments for `netnode decrypt`
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Envelope file (defaults to encrypted_data.json in the data directory)
    pub input: Option<PathBuf>,

    /// Output file, or `-` for stdout (defaults to decrypted_data.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Prompt for the secret instead of using the envelope's secret fields
    #[arg(long)]
    pub prompt_secret: bool,

    /// Write plaintext exactly as decrypted, without pretty-printing
    #[arg(long)]
    pub raw: bool,
}

/// Handle the decrypt command
pub fn handle_decrypt_command(
    paths: &NetNodePaths,
    settings: &Settings,
    format: &EnvelopeFormat,
    args: DecryptArgs,
) -> NetNodeResult<()> {
    let input = args.input.unwrap_or_else(|| paths.envelope_file());
    let raw = read_text(&input)?;
    tracing::info!(path = %input.display(), "read envelope");

    let envelope = parse(&raw, format)?;
    let decryptor = Decryptor::new();

    let result = if args.prompt_secret {
        let password = prompt_secret("Envelope secret: ")?;
        decryptor.decrypt_with_password(envelope, &password)
    } else {
        decryptor.decrypt(envelope)
    };
    let plaintext = result.map_err(|err| {
        tracing::debug!(stage = ?err.stage(), kind = %err.kind(), "decryption stopped");
        err
    })?;

    let text = if settings.pretty_output && !args.raw {
        pretty_json(plaintext)
    } else {
        plaintext
    };

    let output = args.output.unwrap_or_else(|| paths.decrypted_file());
    if output == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writeln!(stdout)?;
        }
    } else {
        write_text_atomic(&output, &text)?;
        println!("Decrypted to {}", output.display());
    }

    Ok(())
}

/// Re-indent JSON plaintext; anything else passes through untouched
fn pretty_json(plaintext: String) -> String {
    match serde_json::from_str::<Value>(&plaintext) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(plaintext),
        Err(_) => {
            tracing::warn!("decrypted text is not JSON, writing it unchanged");
            plaintext
        }
    }
}

/// Prompt for a secret (hidden input)
fn prompt_secret(prompt: &str) -> NetNodeResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::new)
        .map_err(|e| NetNodeError::Io(format!("Failed to read secret: {}", e)))
}
