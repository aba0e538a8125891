use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use netnode::cli::{
    handle_config_command, handle_decrypt_command, handle_inspect_command,
    handle_profiles_command, resolve_format, ConfigArgs, DecryptArgs, InspectArgs,
    ProfilesCommands,
};
use netnode::config::{NetNodePaths, Settings};
use netnode::NetNodeError;

#[derive(Parser)]
#[command(
    name = "netnode",
    version,
    about = "Decrypt and manage encrypted proxy client configuration",
    long_about = "NetNode opens password-sealed configuration envelopes \
                  (PBKDF2 + AES-256-GCM) and works with the v2ray, clash and \
                  sing-box profiles inside them."
)]
struct Cli {
    /// Tracing filter, e.g. `info` or `netnode=debug` (NETNODE_LOG and RUST_LOG win)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Envelope preset: standard, appended or legacy
    #[arg(long, global = true)]
    preset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt an envelope
    Decrypt(DecryptArgs),

    /// Describe an envelope without decrypting it
    Inspect(InspectArgs),

    /// Work with a decrypted profile bundle
    #[command(subcommand)]
    Profiles(ProfilesCommands),

    /// Show current configuration and paths
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<NetNodeError>()
            .map_or(1, NetNodeError::exit_code);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = NetNodePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    init_tracing(cli.log_level.as_deref().unwrap_or(&settings.log_level));

    let format = resolve_format(&settings, cli.preset.as_deref())?;
    let preset = cli
        .preset
        .clone()
        .unwrap_or_else(|| settings.envelope.preset.clone());
    tracing::debug!(base_dir = %paths.base_dir().display(), ?format, "resolved configuration");

    match cli.command {
        Commands::Decrypt(args) => handle_decrypt_command(&paths, &settings, &format, args)?,
        Commands::Inspect(args) => handle_inspect_command(&paths, &format, args)?,
        Commands::Profiles(cmd) => handle_profiles_command(&paths, &settings, cmd)?,
        Commands::Config(args) => {
            handle_config_command(&paths, &settings, &preset, &format, args)?
        }
    }

    Ok(())
}

/// Log to stderr so decrypted output on stdout stays clean
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_env("NETNODE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
