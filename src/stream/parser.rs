//! Command line parser

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use super::{Instruction, DEVICE_ROOT};
use crate::error::Result;
use crate::resolve::{self, Resolver};

/// Turns protocol lines into instructions
pub struct CommandParser {
    resolver: Resolver,
    device_root: PathBuf,
}

impl CommandParser {
    pub fn new(resolver: Resolver) -> Self {
        Self::with_device_root(resolver, DEVICE_ROOT)
    }

    pub fn with_device_root(resolver: Resolver, device_root: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            device_root: device_root.into(),
        }
    }

    /// Parse one line. Never fails: unusable lines become `Ignored`, and
    /// resolution failures are reported before being dropped.
    pub fn parse(&self, line: &str) -> Instruction {
        match self.try_parse(line) {
            Ok(instruction) => instruction,
            Err(e) => {
                warn!("Skipping command: {}", e);
                Instruction::Ignored
            }
        }
    }

    /// Parse one line, surfacing type/code/value resolution failures.
    pub fn try_parse(&self, line: &str) -> Result<Instruction> {
        let tokens = tokenize(line);

        let Some(&first) = tokens.first() else {
            return Ok(Instruction::Ignored);
        };

        if first == "WAIT" {
            return Ok(Instruction::Wait(wait_duration(tokens.get(1).copied())));
        }

        if tokens.len() != 4 && tokens.len() != 5 {
            return Ok(Instruction::Ignored);
        }

        let target_path = self.resolve_device(tokens[0]);
        let event_type = self.resolver.event_type(tokens[1])?;
        let event_code = self.resolver.event_code(event_type, tokens[2])?;
        let value = resolve::parse_value(tokens[3])?;
        let sync = tokens.get(4) == Some(&"SYNC");

        Ok(Instruction::EmitEvent {
            target_path,
            event_type,
            event_code,
            value,
            sync,
        })
    }

    /// Bare names live under the device root; anything with a `/` is a path.
    pub fn resolve_device(&self, token: &str) -> PathBuf {
        if token.contains('/') {
            PathBuf::from(token)
        } else {
            self.device_root.join(token)
        }
    }
}

/// Strip one trailing line terminator and split on spaces, dropping empty fields.
fn tokenize(line: &str) -> Vec<&str> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.split(' ').filter(|t| !t.is_empty()).collect()
}

/// Seconds to sleep for a `WAIT` argument.
///
/// Reads the longest leading float, the way `atof` does. Anything
/// unreadable, negative or non-finite is a zero-length wait.
fn wait_duration(arg: Option<&str>) -> Duration {
    let secs = arg.map(leading_float).unwrap_or(0.0);
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).unwrap_or_default()
    } else {
        Duration::ZERO
    }
}

fn leading_float(text: &str) -> f64 {
    let text = text.trim_start();
    (1..=text.len())
        .rev()
        .filter(|&end| text.is_char_boundary(end))
        .find_map(|end| text[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CommandParser {
        CommandParser::new(Resolver::standard())
    }

    fn emit(path: &str, event_type: u16, event_code: u16, value: i32, sync: bool) -> Instruction {
        Instruction::EmitEvent {
            target_path: PathBuf::from(path),
            event_type,
            event_code,
            value,
            sync,
        }
    }

    #[test]
    fn test_symbolic_line() {
        assert_eq!(
            parser().parse("event3 EV_KEY KEY_A 1\n"),
            emit("/dev/input/event3", 1, 30, 1, false)
        );
    }

    #[test]
    fn test_literal_fallback() {
        assert_eq!(parser().parse("event3 1 0 1"), emit("/dev/input/event3", 1, 0, 1, false));
        assert_eq!(
            parser().parse("event3 0x02 010 -3"),
            emit("/dev/input/event3", 2, 8, -3, false)
        );
    }

    #[test]
    fn test_sync_flag() {
        let p = parser();
        assert_eq!(p.parse("event0 EV_REL REL_X 5 SYNC"), emit("/dev/input/event0", 2, 0, 5, true));
        assert_eq!(p.parse("event0 EV_REL REL_X 5 sync"), emit("/dev/input/event0", 2, 0, 5, false));
        assert_eq!(p.parse("event0 EV_REL REL_X 5 NOW"), emit("/dev/input/event0", 2, 0, 5, false));
    }

    #[test]
    fn test_device_resolution() {
        let p = parser();
        assert_eq!(p.resolve_device("event3"), PathBuf::from("/dev/input/event3"));
        assert_eq!(p.resolve_device("/tmp/myfifo"), PathBuf::from("/tmp/myfifo"));
        assert_eq!(p.resolve_device("by-id/kbd"), PathBuf::from("by-id/kbd"));

        let custom = CommandParser::with_device_root(Resolver::standard(), "/tmp/input");
        assert_eq!(custom.resolve_device("event1"), PathBuf::from("/tmp/input/event1"));
    }

    #[test]
    fn test_wrong_token_counts_are_ignored() {
        let p = parser();
        for line in [
            "event3",
            "event3 EV_KEY",
            "event3 EV_KEY KEY_A",
            "event3 EV_KEY KEY_A 1 SYNC extra",
            "a b c d e f g",
        ] {
            assert_eq!(p.parse(line), Instruction::Ignored, "line: {line}");
        }
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let p = parser();
        assert_eq!(p.parse("\n"), Instruction::Ignored);
        assert_eq!(p.parse(""), Instruction::Ignored);
        assert_eq!(p.parse("   \n"), Instruction::Ignored);
    }

    #[test]
    fn test_repeated_spaces_collapse() {
        assert_eq!(
            parser().parse("event3  EV_KEY   KEY_A 0\r\n"),
            emit("/dev/input/event3", 1, 30, 0, false)
        );
    }

    #[test]
    fn test_resolution_failures() {
        let p = parser();
        assert!(matches!(
            p.try_parse("event3 EV_BOGUS KEY_A 1"),
            Err(crate::error::InjectError::InvalidType(_))
        ));
        assert!(matches!(
            p.try_parse("event3 EV_REL KEY_A 1"),
            Err(crate::error::InjectError::InvalidCode(_))
        ));
        assert!(matches!(
            p.try_parse("event3 EV_KEY KEY_A 4294967296"),
            Err(crate::error::InjectError::InvalidValue(_))
        ));
        assert_eq!(p.parse("event3 EV_KEY KEY_A 4294967296"), Instruction::Ignored);
    }

    #[test]
    fn test_wait() {
        let p = parser();
        assert_eq!(p.parse("WAIT 1.5\n"), Instruction::Wait(Duration::from_millis(1500)));
        assert_eq!(p.parse("WAIT 2"), Instruction::Wait(Duration::from_secs(2)));
        assert_eq!(p.parse("WAIT 0.25 trailing"), Instruction::Wait(Duration::from_millis(250)));
    }

    #[test]
    fn test_wait_is_lenient() {
        let p = parser();
        assert_eq!(p.parse("WAIT"), Instruction::Wait(Duration::ZERO));
        assert_eq!(p.parse("WAIT soon"), Instruction::Wait(Duration::ZERO));
        assert_eq!(p.parse("WAIT -3"), Instruction::Wait(Duration::ZERO));
        assert_eq!(p.parse("WAIT inf"), Instruction::Wait(Duration::ZERO));
        assert_eq!(p.parse("WAIT 0.5s"), Instruction::Wait(Duration::from_millis(500)));
    }
}
