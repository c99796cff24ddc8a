use crate::{CursorError, DecodeError, ReadError};
use std::fmt;
use std::io;
use std::path::PathBuf;

/// An error that can occur when loading or decoding a save
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns the byte offset that the error occurs (if available)
    pub fn offset(&self) -> Option<usize> {
        self.0.offset()
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// A read or skip would have gone past the end of the buffer
    OutOfBounds {
        offset: usize,
        requested: usize,
        remaining: usize,
    },

    /// The file could not be read
    Load { path: PathBuf, source: io::Error },

    /// The file was read but contained no data
    Empty { path: PathBuf },
}

impl ErrorKind {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ErrorKind::OutOfBounds { offset, .. } => Some(offset),
            _ => None,
        }
    }

    /// Whether this error came from loading the file rather than decoding it
    pub fn is_load_failure(&self) -> bool {
        matches!(self, ErrorKind::Load { .. } | ErrorKind::Empty { .. })
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Load { ref source, .. } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::OutOfBounds {
                offset,
                requested,
                remaining,
            } => write!(
                f,
                "out of bounds read of {} bytes at offset {} ({} remain)",
                requested, offset, remaining
            ),
            ErrorKind::Load { ref path, ref source } => {
                write!(f, "unable to read {}: {}", path.display(), source)
            }
            ErrorKind::Empty { ref path } => write!(f, "{} is empty", path.display()),
        }
    }
}

impl From<CursorError> for Error {
    fn from(error: CursorError) -> Self {
        let offset = error.position();
        match error.into_kind() {
            ReadError::OutOfBounds {
                requested,
                remaining,
            } => Error::new(ErrorKind::OutOfBounds {
                offset,
                requested,
                remaining,
            }),
        }
    }
}

/// Drops the partially decoded fields
impl<'a> From<DecodeError<'a>> for Error {
    fn from(error: DecodeError<'a>) -> Self {
        Error::from(*error.cursor_error())
    }
}
