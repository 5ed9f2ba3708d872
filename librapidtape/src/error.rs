//! Error types for tape device operations.

use std::{io, path};
use thiserror::Error;

/// Everything that can go wrong while driving a tape device.
///
/// Driver failures are carried through untouched in `Driver`; every other
/// variant is raised by this library itself.
#[derive(Error, Debug)]
pub enum TapeError {
    /// The driver could not open the device. No device state was created.
    #[error("could not open tape device {}: {}", .path.display(), .source)]
    Open {
        path: path::PathBuf,
        #[source]
        source: io::Error,
    },

    /// The operation is not valid for the device's lifecycle or media state.
    #[error("{0}")]
    State(&'static str),

    /// The requested region does not lie within the buffer.
    #[error("buffer region {offset}+{length} is out of bounds for a buffer of {buffer} bytes")]
    Bounds {
        offset: usize,
        length: usize,
        buffer: usize,
    },

    /// The drive has reported the early warning near the end of the medium
    /// and writes have not been allowed past it.
    #[error("logical end-of-media ({written} bytes written)")]
    LogicalEndOfMedia { written: usize },

    #[error(transparent)]
    Driver(#[from] io::Error),

    /// Invalid writer or device parameters.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TapeError {
    /// Check that `offset..offset + length` names a region inside a buffer of
    /// `buffer` bytes.
    pub(crate) fn check_bounds(buffer: usize, offset: usize, length: usize) -> Result<(), TapeError> {
        match offset.checked_add(length) {
            Some(end) if end <= buffer => Ok(()),
            _ => Err(TapeError::Bounds { offset, length, buffer }),
        }
    }
}

impl From<TapeError> for io::Error {
    fn from(err: TapeError) -> io::Error {
        match err {
            TapeError::Driver(inner) => inner,
            TapeError::Open { source, .. } => io::Error::new(source.kind(), source),
            e @ TapeError::LogicalEndOfMedia { .. } => io::Error::new(io::ErrorKind::WriteZero, e),
            e @ TapeError::Bounds { .. } | e @ TapeError::Config(_) => io::Error::new(io::ErrorKind::InvalidInput, e),
            e @ TapeError::State(_) => io::Error::new(io::ErrorKind::Other, e),
        }
    }
}
