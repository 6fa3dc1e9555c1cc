//! evinject
//!
//! Writes synthetic input events to kernel evdev nodes, either a single
//! event from the command line or a stream of commands read from a FIFO.

mod cli;
mod device;
mod error;
mod resolve;
mod stream;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Mode};
use device::EventSink;
use error::InjectError;
use resolve::Resolver;

/// Main entry point
fn main() {
    // Log to stderr, RUST_LOG overrides the default level
    tracing_subscriber::fmt::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    match run(Cli::parse()) {
        Ok(()) => process::exit(0),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            if matches!(e.downcast_ref::<InjectError>(), Some(InjectError::Argument(_))) {
                eprintln!("\n{}", Cli::command().render_usage());
            }
            process::exit(1);
        }
    }
}

/// Dispatch to one-shot or stream mode
fn run(cli: Cli) -> Result<()> {
    let resolver = Resolver::standard();

    match cli.into_mode(&resolver)? {
        Mode::Stream { fifo } => {
            info!("Stream mode on {}", fifo.display());
            match stream::serve(&fifo, resolver).context("Failed to serve command FIFO")? {}
        }
        Mode::OneShot {
            device,
            event,
            sync,
        } => {
            let mut sink = device::create_sink();
            sink.emit(&device, event, sync)
                .with_context(|| format!("Failed to inject event into {}", device.display()))?;
            Ok(())
        }
    }
}
