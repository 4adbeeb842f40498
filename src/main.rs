use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

// Use the library modules
use acrobat_installer::commands::{
    self,
    install::{InstallOutcome, InstallWorkflow},
};
use acrobat_installer::core::{
    config::Config,
    download::{Downloader, HttpTransport},
    installer::MsiInstaller,
    registry::SystemRegistry,
};

#[derive(Parser)]
#[clap(name = "acrobat-installer")]
#[clap(about = "Silently install Adobe Acrobat Pro if it is not already present")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Only write the read-only viewing policy to the registry, then exit
    #[clap(long = "readonlymode")]
    read_only_mode: bool,
    /// JSON file overriding the built-in product settings
    #[clap(long)]
    config: Option<PathBuf>,
    /// Directory for the download, extracted files and install log
    #[clap(long)]
    temp_dir: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Accepts the historical single-dash `-readonlymode` spelling.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            if arg == "-readonlymode" {
                OsString::from("--readonlymode")
            } else {
                arg
            }
        })
        .collect()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if cli.read_only_mode {
        return commands::read_only::configure_read_only_mode(&SystemRegistry)
            .context("Error setting Acrobat to read-only mode");
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(temp_dir) = &cli.temp_dir {
        config = config.with_temp_dir(temp_dir.clone());
    }
    log::debug!("Using temp directory {}", config.temp_dir.display());

    let downloader = Downloader::new(HttpTransport::new()?);
    let installer = MsiInstaller::default();

    let outcome = InstallWorkflow::new(&config, &SystemRegistry, &downloader, &installer)
        .run()
        .with_context(|| format!("Installing {} failed", config.product_name))?;

    match outcome {
        InstallOutcome::AlreadyInstalled(_) => log::info!("Exiting without changes"),
        InstallOutcome::Installed => log::info!("Installation complete"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
