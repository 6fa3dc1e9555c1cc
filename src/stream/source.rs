//! Command sources

use nix::errno::Errno;
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use std::fs::{self, File};
use std::os::unix::fs::FileTypeExt;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{InjectError, Result};

/// Trait for line-oriented command sources
pub trait LineSource {
    /// Read one line including its terminator into `buf`.
    /// Returns the number of bytes read; `0` means end of stream.
    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize>;

    /// Drop the current handle and open a fresh one.
    fn reopen(&mut self) -> io::Result<()>;
}

/// Named pipe that is reopened whenever its writer goes away
pub struct FifoSource {
    path: PathBuf,
    reader: BufReader<File>,
}

impl FifoSource {
    /// Create the FIFO if needed and open it for reading.
    ///
    /// Blocks until a writer connects, as opening a FIFO does.
    pub fn open(path: &Path) -> Result<Self> {
        create_fifo(path)?;
        let reader = open_reader(path).map_err(|source| InjectError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Command FIFO {} connected", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            reader,
        })
    }
}

impl LineSource for FifoSource {
    fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.reader.read_until(b'\n', buf)
    }

    fn reopen(&mut self) -> io::Result<()> {
        // Assigning drops the stale handle once the new one is open
        self.reader = open_reader(&self.path)?;
        Ok(())
    }
}

fn create_fifo(path: &Path) -> Result<()> {
    match mkfifo(path, Mode::from_bits_truncate(0o666)) {
        Ok(()) => {
            debug!("Created FIFO {}", path.display());
            Ok(())
        }
        Err(Errno::EEXIST) => {
            let is_fifo = fs::metadata(path)
                .map(|m| m.file_type().is_fifo())
                .map_err(|source| InjectError::SourceUnavailable {
                    path: path.to_path_buf(),
                    source,
                })?;
            if is_fifo {
                Ok(())
            } else {
                Err(InjectError::SourceUnavailable {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::InvalidInput, "not a FIFO"),
                })
            }
        }
        Err(errno) => Err(InjectError::SourceUnavailable {
            path: path.to_path_buf(),
            source: io::Error::from(errno),
        }),
    }
}

fn open_reader(path: &Path) -> io::Result<BufReader<File>> {
    File::open(path).map(BufReader::new)
}
