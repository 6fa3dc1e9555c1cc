//! Stream interpreter state machine

use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::{CommandParser, Instruction, LineSource};
use crate::device::{EventSink, RawEvent};

/// Delay before retrying a FIFO that could not be reopened
const REOPEN_RETRY: Duration = Duration::from_millis(100);

/// Line buffer capacity kept between reads
const LINE_CAPACITY: usize = 4096;

/// Interpreter states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Blocked on the next command line
    AwaitingLine,
    /// Executing the instruction parsed from the last line
    Dispatching,
    /// The writer side went away; the source must be reopened
    SourceClosed,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamState::AwaitingLine => write!(f, "AwaitingLine"),
            StreamState::Dispatching => write!(f, "Dispatching"),
            StreamState::SourceClosed => write!(f, "SourceClosed"),
        }
    }
}

/// Sequential executor of command lines read from a source
pub struct Interpreter<S, E> {
    source: S,
    sink: E,
    parser: CommandParser,
    state: StreamState,
    line: Vec<u8>,
}

impl<S: LineSource, E: EventSink> Interpreter<S, E> {
    /// Create an interpreter over an already opened source
    pub fn new(source: S, sink: E, parser: CommandParser) -> Self {
        Self {
            source,
            sink,
            parser,
            state: StreamState::AwaitingLine,
            line: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Serve commands forever
    pub fn run(mut self) -> ! {
        info!("Serving command stream");
        loop {
            self.step();
        }
    }

    /// Advance the state machine by one transition.
    ///
    /// From `AwaitingLine` this reads and fully executes one line (or moves to
    /// `SourceClosed` on end of stream); from `SourceClosed` it reopens the
    /// source.
    pub fn step(&mut self) {
        match self.state {
            StreamState::AwaitingLine => self.await_line(),
            StreamState::SourceClosed => self.reopen(),
            // Dispatching never outlives a single step
            StreamState::Dispatching => self.transition_to(StreamState::AwaitingLine),
        }
    }

    fn await_line(&mut self) {
        self.line.clear();
        self.line.shrink_to(LINE_CAPACITY);
        match self.source.read_line(&mut self.line) {
            Ok(0) => {
                debug!("Command source reached end of stream");
                self.transition_to(StreamState::SourceClosed);
            }
            Ok(_) => {
                self.transition_to(StreamState::Dispatching);
                let instruction = self.parser.parse(&String::from_utf8_lossy(&self.line));
                self.execute(instruction);
                self.transition_to(StreamState::AwaitingLine);
            }
            Err(e) => {
                warn!("Failed to read command source: {}", e);
                self.transition_to(StreamState::SourceClosed);
            }
        }
    }

    fn reopen(&mut self) {
        match self.source.reopen() {
            Ok(()) => {
                info!("Command source reopened");
                self.transition_to(StreamState::AwaitingLine);
            }
            Err(e) => {
                warn!("Failed to reopen command source: {}", e);
                thread::sleep(REOPEN_RETRY);
            }
        }
    }

    fn execute(&mut self, instruction: Instruction) {
        match instruction {
            Instruction::EmitEvent {
                target_path,
                event_type,
                event_code,
                value,
                sync,
            } => {
                let event = RawEvent::new(event_type, event_code, value);
                match self.sink.emit(&target_path, event, sync) {
                    Ok(()) => info!("sent: 0"),
                    Err(e) => {
                        error!("Failed to emit event: {}", e);
                        info!("sent: -1");
                    }
                }
            }
            Instruction::Wait(duration) => {
                debug!("Waiting {:?}", duration);
                thread::sleep(duration);
            }
            Instruction::Ignored => {}
        }
    }

    fn transition_to(&mut self, new_state: StreamState) {
        debug!("State transition: {} -> {}", self.state, new_state);
        self.state = new_state;
    }
}
