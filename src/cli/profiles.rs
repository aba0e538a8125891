//! Profile CLI commands
//!
//! Work on an already-decrypted bundle: list, validate, export and merge.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::{NetNodePaths, Settings};
use crate::display::{format_issues, format_profile_list};
use crate::error::{NetNodeError, NetNodeResult};
use crate::export::{export_bundle_json, export_bundle_yaml, import_from_yaml, ExportFormat};
use crate::profiles::ProfileBundle;
use crate::storage::{read_text, write_text_atomic};

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfilesCommands {
    /// List the profiles in a decrypted bundle
    List {
        /// Decrypted bundle (defaults to decrypted_data.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Check servers, ports and UUIDs
    Validate {
        /// Decrypted bundle (defaults to decrypted_data.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Export the bundle as JSON or YAML
    Export {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short = 't', long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Decrypted bundle (defaults to decrypted_data.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Merge a partial bundle into the decrypted bundle
    Merge {
        /// JSON file holding the fields to overwrite, or a YAML export
        /// written by `profiles export --format yaml`
        patch: PathBuf,

        /// Decrypted bundle to update (defaults to decrypted_data.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Handle a profiles command
pub fn handle_profiles_command(
    paths: &NetNodePaths,
    settings: &Settings,
    cmd: ProfilesCommands,
) -> NetNodeResult<()> {
    match cmd {
        ProfilesCommands::List { file } => {
            let bundle = load_bundle(&file.unwrap_or_else(|| paths.decrypted_file()))?;
            print!("{}", format_profile_list(&bundle.summaries()));
            Ok(())
        }
        ProfilesCommands::Validate { file } => {
            let bundle = load_bundle(&file.unwrap_or_else(|| paths.decrypted_file()))?;
            if bundle.is_empty() {
                return Err(NetNodeError::Profile(
                    "Bundle has no v2ray, clash or singbox section".into(),
                ));
            }

            let issues = bundle.validate();
            print!("{}", format_issues(&issues));
            if !issues.is_empty() {
                return Err(NetNodeError::Profile(format!(
                    "{} profile problem(s) found",
                    issues.len()
                )));
            }
            println!();
            Ok(())
        }
        ProfilesCommands::Export {
            output,
            format,
            file,
        } => {
            let bundle = load_bundle(&file.unwrap_or_else(|| paths.decrypted_file()))?;
            handle_export(&bundle, &output, format, settings.pretty_output)
        }
        ProfilesCommands::Merge { patch, file } => {
            let target = file.unwrap_or_else(|| paths.decrypted_file());
            let mut bundle = load_bundle(&target)?;
            let update = load_patch(&patch)?;

            bundle.merge(update);
            write_text_atomic(&target, &bundle.to_json(settings.pretty_output)?)?;

            println!("Merged {} into {}", patch.display(), target.display());
            Ok(())
        }
    }
}

fn load_bundle(path: &Path) -> NetNodeResult<ProfileBundle> {
    let text = read_text(path)?;
    ProfileBundle::from_json(&text)
}

/// Read a merge patch; `.yaml`/`.yml` files are read as profile exports
fn load_patch(path: &Path) -> NetNodeResult<ProfileBundle> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        import_from_yaml(&read_text(path)?)
    } else {
        load_bundle(path)
    }
}

fn handle_export(
    bundle: &ProfileBundle,
    output: &Path,
    format: ExportFormat,
    pretty: bool,
) -> NetNodeResult<()> {
    let file = File::create(output).map_err(|e| {
        NetNodeError::Export(format!("Failed to create {}: {}", output.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Json => export_bundle_json(bundle, &mut writer, pretty)?,
        ExportFormat::Yaml => export_bundle_yaml(bundle, &mut writer)?,
    }
    writer
        .flush()
        .map_err(|e| NetNodeError::Export(e.to_string()))?;

    println!(
        "Exported {} profile(s) to {}",
        bundle.summaries().len(),
        output.display()
    );
    Ok(())
}
