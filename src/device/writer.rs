//! Raw `input_event` writer for evdev nodes

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::mem;
use std::path::Path;
use std::slice;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use super::{EventSink, RawEvent};
use crate::error::{InjectError, Result};
use crate::resolve::names::{self, EV_MAX, EV_SYN, SYN_REPORT};

/// Writes events by opening the target write-only for each emission
#[derive(Debug, Default)]
pub struct DeviceWriter;

impl DeviceWriter {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for DeviceWriter {
    fn emit(&mut self, path: &Path, event: RawEvent, sync: bool) -> Result<()> {
        // Dropping the handle closes the device on every return path
        let mut device = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| InjectError::DeviceOpen {
                path: path.to_path_buf(),
                source,
            })?;

        let ev = create_event(event)?;
        play_one(&mut device, &ev).map_err(|source| InjectError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Wrote {:?} to {}", event, path.display());

        if sync {
            let syn = create_event(RawEvent::new(EV_SYN, SYN_REPORT, 0))?;
            play_one(&mut device, &syn).map_err(|source| InjectError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            debug!("Wrote SYN_REPORT to {}", path.display());
        }

        Ok(())
    }
}

/// Build a kernel event record stamped with the current time.
///
/// Fails when the type is beyond `EV_MAX`, carries no codes, or the code is
/// past the type's highest code.
pub fn create_event(event: RawEvent) -> Result<libc::input_event> {
    let in_range = event.event_type <= EV_MAX
        && names::max_code(event.event_type).is_some_and(|max| event.code <= max);
    if !in_range {
        return Err(InjectError::EventConstruction {
            event_type: event.event_type,
            code: event.code,
        });
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    Ok(libc::input_event {
        time: libc::timeval {
            tv_sec: now.as_secs() as libc::time_t,
            tv_usec: now.subsec_micros() as libc::suseconds_t,
        },
        type_: event.event_type,
        code: event.code,
        value: event.value,
    })
}

fn play_one(device: &mut File, ev: &libc::input_event) -> io::Result<()> {
    // SAFETY: input_event is a plain C struct; its bytes are exactly what the
    // kernel expects on a write to an evdev node.
    let bytes = unsafe {
        slice::from_raw_parts(
            (ev as *const libc::input_event).cast::<u8>(),
            mem::size_of::<libc::input_event>(),
        )
    };
    device.write_all(bytes)
}
