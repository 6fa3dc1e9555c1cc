//! Event emission
//!
//! Delivers single input events to kernel device nodes

pub mod writer;

use crate::error::Result;
use std::path::Path;

/// A fully resolved input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }
}

/// Trait for event sinks
pub trait EventSink {
    /// Write `event` to the device at `path`, followed by a `SYN_REPORT`
    /// when `sync` is set. The device is open only for the duration of
    /// the call.
    fn emit(&mut self, path: &Path, event: RawEvent, sync: bool) -> Result<()>;
}

/// Create the sink that writes to real device nodes
pub fn create_sink() -> Box<dyn EventSink> {
    Box::new(writer::DeviceWriter::new())
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&mut self, path: &Path, event: RawEvent, sync: bool) -> Result<()> {
        (**self).emit(path, event, sync)
    }
}
