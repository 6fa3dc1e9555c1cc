//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

use crate::device::RawEvent;
use crate::error::{InjectError, Result};
use crate::resolve::{self, Resolver};

/// FIFO used when `--fifo` is given without a path
pub const DEFAULT_FIFO: &str = "/tmp/evinject.fifo";

const AFTER_HELP: &str = "\
One-shot:  evinject [--sync] <DEVICE> --type <TYPE> --code <CODE> --value <VALUE>
FIFO mode: evinject --fifo=<PATH>

In FIFO mode each line written to the pipe is one command:
  <device> <type> <code> <value> [SYNC]
  WAIT <seconds>
Bare device names are looked up under /dev/input/.";

/// Inject input events into evdev device nodes.
#[derive(Debug, Parser)]
#[command(name = "evinject", version, about, after_help = AFTER_HELP)]
pub struct Cli {
    /// Event type, by name (EV_KEY) or number
    #[arg(long = "type", value_name = "TYPE")]
    pub event_type: Option<String>,

    /// Event code, by name (KEY_A) or number
    #[arg(long, value_name = "CODE")]
    pub code: Option<String>,

    /// Event value (signed 32-bit)
    #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Follow the event with a SYN_REPORT
    #[arg(long)]
    pub sync: bool,

    /// Device node to write to
    #[arg(long, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Serve commands from a FIFO; every other argument is ignored
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_FIFO
    )]
    pub fifo: Option<PathBuf>,

    /// Device node, when --device is not used
    #[arg(value_name = "DEVICE")]
    pub positional: Vec<PathBuf>,
}

/// What the process was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Stream { fifo: PathBuf },
    OneShot {
        device: PathBuf,
        event: RawEvent,
        sync: bool,
    },
}

impl Cli {
    /// Validate the arguments and resolve symbolic names.
    pub fn into_mode(self, resolver: &Resolver) -> Result<Mode> {
        if let Some(fifo) = self.fifo {
            return Ok(Mode::Stream { fifo });
        }

        let type_arg = required(self.event_type, "--type")?;
        let code_arg = required(self.code, "--code")?;
        let value_arg = required(self.value, "--value")?;

        let value = resolve::parse_value(&value_arg)?;
        let event_type = resolver.event_type(&type_arg)?;
        let code = resolver.event_code(event_type, &code_arg)?;

        let device = match (self.device, self.positional.as_slice()) {
            (device, []) => device,
            (None, [path]) => Some(path.clone()),
            _ => {
                return Err(InjectError::Argument(
                    "expected exactly one device, either positional or --device".to_string(),
                ))
            }
        };
        let device = device.ok_or_else(|| InjectError::Argument("missing device path".to_string()))?;

        Ok(Mode::OneShot {
            device,
            event: RawEvent::new(event_type, code, value),
            sync: self.sync,
        })
    }
}

fn required(arg: Option<String>, flag: &str) -> Result<String> {
    arg.ok_or_else(|| InjectError::Argument(format!("missing required argument {flag}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(args: &[&str]) -> Result<Mode> {
        let cli = Cli::try_parse_from(std::iter::once("evinject").chain(args.iter().copied())).unwrap();
        cli.into_mode(&Resolver::standard())
    }

    #[test]
    fn test_one_shot_with_positional_device() {
        assert_eq!(
            mode(&["--type", "EV_KEY", "--code", "KEY_A", "--value", "1", "--sync", "/dev/input/event3"]).unwrap(),
            Mode::OneShot {
                device: PathBuf::from("/dev/input/event3"),
                event: RawEvent::new(1, 30, 1),
                sync: true,
            }
        );
    }

    #[test]
    fn test_one_shot_with_device_flag_and_literals() {
        assert_eq!(
            mode(&["--device", "/tmp/dev", "--type", "2", "--code", "0x1", "--value", "-10"]).unwrap(),
            Mode::OneShot {
                device: PathBuf::from("/tmp/dev"),
                event: RawEvent::new(2, 1, -10),
                sync: false,
            }
        );
    }

    #[test]
    fn test_fifo_overrides_everything() {
        assert_eq!(
            mode(&["--fifo=/tmp/cmds", "--type", "EV_NOPE", "a", "b"]).unwrap(),
            Mode::Stream { fifo: PathBuf::from("/tmp/cmds") }
        );
        assert_eq!(
            mode(&["--fifo"]).unwrap(),
            Mode::Stream { fifo: PathBuf::from(DEFAULT_FIFO) }
        );
    }

    #[test]
    fn test_missing_fields_are_argument_errors() {
        let cases: &[&[&str]] = &[
            &["--code", "KEY_A", "--value", "1", "event0"],
            &["--type", "EV_KEY", "--value", "1", "event0"],
            &["--type", "EV_KEY", "--code", "KEY_A", "event0"],
            &["--type", "EV_KEY", "--code", "KEY_A", "--value", "1"],
        ];
        for args in cases {
            assert!(matches!(mode(args), Err(InjectError::Argument(_))), "args: {args:?}");
        }
    }

    #[test]
    fn test_ambiguous_device_is_rejected() {
        assert!(matches!(
            mode(&["--type", "EV_KEY", "--code", "KEY_A", "--value", "1", "--device", "/tmp/a", "/tmp/b"]),
            Err(InjectError::Argument(_))
        ));
        assert!(matches!(
            mode(&["--type", "EV_KEY", "--code", "KEY_A", "--value", "1", "/tmp/a", "/tmp/b"]),
            Err(InjectError::Argument(_))
        ));
    }

    #[test]
    fn test_bad_names_and_values() {
        assert!(matches!(
            mode(&["--type", "EV_NOPE", "--code", "KEY_A", "--value", "1", "x"]),
            Err(InjectError::InvalidType(_))
        ));
        assert!(matches!(
            mode(&["--type", "EV_KEY", "--code", "REL_X", "--value", "1", "x"]),
            Err(InjectError::InvalidCode(_))
        ));
        assert!(matches!(
            mode(&["--type", "EV_KEY", "--code", "KEY_A", "--value", "99999999999", "x"]),
            Err(InjectError::InvalidValue(_))
        ));
    }
}
