//! commandbox - a sandboxed command computer
//!
//! Runs commands through a gated command computer, either from a JSON script
//! or line by line from stdin.

mod command_script;
mod commands;
mod config;
mod console;
mod headless;
mod runtime;
mod world;

use anyhow::{Context, Result};
use clap::Parser;
use command_script::CommandScriptPlayer;
use config::ProxyConfig;
use headless::HeadlessConfig;
use runtime::Runtime;
use std::io;
use std::path::PathBuf;
use tracing::info;
use world::Session;

#[derive(Debug, Parser)]
#[command(name = "commandbox", version, about)]
struct CliOptions {
    /// TOML configuration file (defaults to config/commandbox.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON command script; reads commands from stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Name of the actor using the computer.
    #[arg(long, default_value = "admin")]
    actor: String,
    /// Give the actor the elevated role.
    #[arg(long)]
    elevated: bool,
    /// Override the computer label from the config.
    #[arg(long)]
    label: Option<String>,
    /// Append a JSONL record for every executed command.
    #[arg(long)]
    transcript: Option<PathBuf>,
    /// Stop a script run after this many ticks.
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Write the effective configuration to this path and exit.
    #[arg(long)]
    dump_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    info!("Starting commandbox v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse();
    let mut config = match cli.config.as_deref() {
        Some(path) => ProxyConfig::load_from_path(path),
        None => ProxyConfig::load(),
    };
    if let Some(label) = cli.label.clone() {
        config.computer.label = Some(label);
    }

    if let Some(path) = cli.dump_config.as_deref() {
        config
            .save_to_path(path)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        return Ok(());
    }

    let session = Session::new(cli.actor.clone(), cli.elevated, config.actor_spawn());
    let mut runtime = Runtime::new(&config, session);
    if let Some(path) = cli.transcript.as_deref() {
        runtime = runtime.with_transcript(path)?;
    }

    if !runtime.actor_can_use() {
        match runtime.session.last_status() {
            Some(denial) => anyhow::bail!("{} cannot use the computer: {denial}", cli.actor),
            None => anyhow::bail!("{} is out of reach of the computer", cli.actor),
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.script {
        Some(path) => {
            let script = CommandScriptPlayer::from_path(&path)
                .with_context(|| format!("failed to load command script {}", path.display()))?;
            let cfg = HeadlessConfig {
                max_ticks: cli.max_ticks,
                echo: true,
            };
            headless::run(&mut runtime, script, &cfg, &mut out)
        }
        None => console::run(&mut runtime, io::stdin().lock(), &mut out),
    }
}
