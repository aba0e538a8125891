//! Config CLI command
//!
//! Shows resolved paths and the active envelope format.

use clap::Args;

use crate::config::{NetNodePaths, Settings};
use crate::crypto::EnvelopeFormat;
use crate::error::NetNodeResult;

/// Arguments for `netnode config`
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Write the current settings to config.json
    #[arg(long)]
    pub init: bool,
}

/// Handle the config command
pub fn handle_config_command(
    paths: &NetNodePaths,
    settings: &Settings,
    preset: &str,
    format: &EnvelopeFormat,
    args: ConfigArgs,
) -> NetNodeResult<()> {
    if args.init {
        settings.save(paths)?;
        println!("Wrote {}", paths.settings_file().display());
        println!();
    }

    println!("NetNode Configuration");
    println!("=====================");
    println!("Data directory:  {}", paths.base_dir().display());
    println!("Settings file:   {}", paths.settings_file().display());
    println!("Envelope input:  {}", paths.envelope_file().display());
    println!("Decrypted file:  {}", paths.decrypted_file().display());
    println!();
    println!("Envelope format:");
    if preset == settings.envelope.preset {
        println!("  Preset:         {}", preset);
    } else {
        println!(
            "  Preset:         {} (overrides {} from settings)",
            preset, settings.envelope.preset
        );
    }
    println!("  Tag layout:     {}", format.tag_layout);
    println!("  Secret fields:  {}", format.secret_fields.join(", "));
    println!("  Length policy:  {:?}", format.length_policy);
    match format.legacy_iterations {
        Some(iterations) => println!("  Legacy rounds:  {}", iterations),
        None => println!("  Legacy rounds:  none (envelope must carry iterations)"),
    }
    println!("  Default PRF:    {}", format.default_prf);
    println!();
    println!("Log level:       {}", settings.log_level);
    println!("Pretty output:   {}", settings.pretty_output);

    Ok(())
}
