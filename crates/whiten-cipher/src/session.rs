//! File transform orchestration.

use std::fs;
use std::path::PathBuf;

use thiserror::Error as ThisError;

use crate::cipher::{Mode, WhiteningCipher};

/// Errors surfaced by a file transform session.
#[derive(Debug, ThisError)]
pub enum SessionError {
    /// Underlying cipher failure.
    #[error(transparent)]
    Cipher(#[from] whiten_core::Error),

    /// Filesystem failure reading the source or writing the sink.
    /// Surfaced unmodified; the session never retries or suppresses I/O.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One read–transform–write pass over a file.
pub struct FileSession {
    source: PathBuf,
    sink: PathBuf,
    mode: Mode,
}

impl FileSession {
    /// Creates a session; pass the same path twice to transform in place.
    pub fn new(source: impl Into<PathBuf>, sink: impl Into<PathBuf>, mode: Mode) -> FileSession {
        FileSession {
            source: source.into(),
            sink: sink.into(),
            mode,
        }
    }

    /// Reads the source, transforms it, writes the sink, and returns the
    /// resulting bytes for verification.
    pub fn run(&self, cipher: &WhiteningCipher) -> Result<Vec<u8>, SessionError> {
        let data = fs::read(&self.source)?;
        let result = cipher.transform(&data, self.mode)?;
        fs::write(&self.sink, &result)?;
        Ok(result)
    }
}
