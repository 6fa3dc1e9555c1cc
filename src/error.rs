//! Error taxonomy
//!
//! Stream mode reports every variant except `SourceUnavailable` and moves on
//! to the next line; one-shot mode turns the first one into a nonzero exit.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InjectError {
    /// Malformed or missing command-line input
    #[error("{0}")]
    Argument(String),

    #[error("invalid type argument '{0}'")]
    InvalidType(String),

    #[error("invalid code argument '{0}'")]
    InvalidCode(String),

    #[error("invalid value argument '{0}'")]
    InvalidValue(String),

    #[error("could not open device {path}: {source}")]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create event (type {event_type}, code {code})")]
    EventConstruction { event_type: u16, code: u16 },

    #[error("could not play event on {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The command FIFO could not be created or opened
    #[error("command source {path} unavailable: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, InjectError>;
