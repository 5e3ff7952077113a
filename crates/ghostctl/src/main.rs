//! ghostctl - host and drive a ghostpoint virtual mouse
//!
//! `ghostctl run` hosts one device in-process, polls it the way a HID stack
//! would and reads control commands from stdin.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod config;
mod error;
mod output;
mod poller;
mod repl;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ghostpoint_client::{LoopbackTransport, MouseClient};
use ghostpoint_device::{DeviceConfig, VirtualMouse};
use ghostpoint_protocol::MotionMode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "ghostctl")]
#[command(about = "Host a ghostpoint virtual mouse and inject pointer motion")]
#[command(version)]
struct Cli {
    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a device and read commands from stdin
    Run {
        /// JSON device configuration; a missing file means defaults
        #[arg(short, long, env = "GHOSTCTL_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the HID descriptor, report descriptor and device attributes
    Descriptor,

    /// Print the effective device configuration as JSON
    Config {
        /// JSON device configuration; a missing file means defaults
        #[arg(short, long, env = "GHOSTCTL_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "ghostctl={log_level},ghostpoint_device={log_level},ghostpoint_client={log_level}"
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&*e);
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run { config } => run(config.as_deref()).await,
        Commands::Descriptor => descriptor(),
        Commands::Config { config } => {
            let config = config::load(config.as_deref())?;
            println!("{}", config.to_json().map_err(CliError::from)?);
            Ok(())
        }
    }
}

async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = config::load(config_path)?;
    let device = Arc::new(VirtualMouse::new(config).map_err(CliError::from)?);
    device.start().map_err(CliError::from)?;

    let client = MouseClient::connect(LoopbackTransport::new(Arc::clone(&device)))
        .map_err(CliError::from)?;
    println!("{}", output::info_line(&client.device_info()));

    let poller = poller::spawn(Arc::clone(&device));
    let session = repl::Session::new(client);
    let mut lines = repl::spawn_stdin_reader();
    let result = repl::run(&session, &mut lines).await;

    device.remove();
    let summary = poller.await.context("poll loop failed")?;
    info!(
        motion_reports = summary.motion_reports,
        idle_reports = summary.idle_reports,
        "device removed"
    );

    result?;
    Ok(())
}

fn descriptor() -> Result<()> {
    let device = VirtualMouse::new(DeviceConfig::default()).map_err(CliError::from)?;
    let mut buf = [0u8; 256];

    let len = device.hid_descriptor(&mut buf).map_err(CliError::from)?;
    println!("HID descriptor ({len} bytes)");
    println!("{}", output::hex_dump(buf.get(..len).unwrap_or_default()));

    let len = device.report_descriptor(&mut buf).map_err(CliError::from)?;
    println!(
        "report descriptor ({len} bytes, {:?} motion)",
        MotionMode::BUILD
    );
    println!("{}", output::hex_dump(buf.get(..len).unwrap_or_default()));

    println!("{}", output::attributes_line(&device.attributes()));
    Ok(())
}
