//! FIFO command stream
//!
//! Line protocol, one instruction per line, fields separated by spaces:
//!
//! ```text
//! <device> <type> <code> <value> [SYNC]
//! WAIT <seconds>
//! ```
//!
//! Blank lines are ignored. A bare device name is looked up under
//! `/dev/input/`, anything containing a `/` is used as given.

pub mod interpreter;
pub mod parser;
pub mod source;

use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::device;
use crate::error::Result;
use crate::resolve::Resolver;

pub use interpreter::Interpreter;
pub use parser::CommandParser;
pub use source::{FifoSource, LineSource};

/// Directory that bare device names are resolved under
pub const DEVICE_ROOT: &str = "/dev/input/";

/// One parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    EmitEvent {
        target_path: PathBuf,
        event_type: u16,
        event_code: u16,
        value: i32,
        sync: bool,
    },
    Wait(Duration),
    Ignored,
}

/// Serve commands from the FIFO at `path` until the process is terminated.
///
/// Only returns if the FIFO cannot be created or opened at startup.
pub fn serve(path: &Path, resolver: Resolver) -> Result<Infallible> {
    info!("Opening command FIFO {}", path.display());
    let source = FifoSource::open(path)?;
    let parser = CommandParser::new(resolver);
    Interpreter::new(source, device::create_sink(), parser).run()
}
