//! Inspect CLI command

use std::path::PathBuf;

use clap::Args;

use crate::config::NetNodePaths;
use crate::crypto::{inspect, EnvelopeFormat};
use crate::display::format_envelope_summary;
use crate::error::NetNodeResult;
use crate::storage::read_text;

/// Arguments for `netnode inspect`
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Envelope file (defaults to encrypted_data.json in the data directory)
    pub input: Option<PathBuf>,
}

/// Describe an envelope without decrypting it
pub fn handle_inspect_command(
    paths: &NetNodePaths,
    format: &EnvelopeFormat,
    args: InspectArgs,
) -> NetNodeResult<()> {
    let input = args.input.unwrap_or_else(|| paths.envelope_file());
    let raw = read_text(&input)?;

    let summary = inspect(&raw, format)?;
    println!("File: {}", input.display());
    print!("{}", format_envelope_summary(&summary));

    Ok(())
}
