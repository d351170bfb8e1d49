use std::io::Read;
use std::{fs, path::Path};

use anyhow::Context;
use clap::Parser;
use sightline::handler::{handle, ConfPaths};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "sightline",
    about = "Forward an analyst sighting report to a threat-intelligence platform"
)]
struct Cli {
    /// Path to the JSON request envelope; reads stdin when omitted
    request: Option<String>,
    /// Directory holding accounts.toml and settings.toml
    #[arg(long, default_value = "config")]
    config_dir: String,
    /// Optional log file path
    #[arg(long, default_value = "data/sightline.log")]
    log_file: String,
    /// Increase verbosity (info, debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli)?;

    let in_string = match &cli.request {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read request envelope {path}"))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read request envelope from stdin")?;
            buffer
        }
    };

    let config_dir = Path::new(&cli.config_dir);
    let paths = ConfPaths {
        accounts: config_dir.join("accounts.toml"),
        settings: config_dir.join("settings.toml"),
    };

    let response = handle(&in_string, &paths).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_path = Path::new(&cli.log_file);
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create log directory {}", parent.display()))?;
    }
    if log_path.exists() {
        if let Ok(meta) = fs::metadata(log_path) {
            if meta.len() > 1_000_000 {
                let rotated = log_path.with_extension("log.1");
                let _ = fs::rename(log_path, rotated);
            }
        }
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("cannot open log file {}", log_path.display()))?;

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(false);

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|err| anyhow::anyhow!("cannot initialize logging: {err}"))
}
