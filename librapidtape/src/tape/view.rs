//! Read and write handles onto an open tape device.

use std::io;
use crate::error::TapeError;
use crate::tape::device::{SharedCore, lock_core, close_core};

/// Reading handle onto a `TapeDevice`.
///
/// Reads are passed to the drive one call at a time and are never retried or
/// batched: a short read tells the caller where a tape block ended. Once the
/// drive reports a file mark, reads return end-of-stream until the device's
/// `clear_eof` is called.
pub struct DeviceInputView {
    core: SharedCore,
    scratch: [u8; 1],
}

/// Writing handle onto a `TapeDevice`.
///
/// Every write either reaches the drive in full or fails. Use
/// `FixedRecordWriter` on top of this to keep writes block-aligned.
pub struct DeviceOutputView {
    core: SharedCore,
    scratch: [u8; 1],
}

impl DeviceInputView {
    pub(crate) fn new(core: SharedCore) -> DeviceInputView {
        DeviceInputView {
            core: core,
            scratch: [0],
        }
    }

    /// Read at most `length` bytes into `buf[offset..]`.
    ///
    /// # Returns
    ///
    /// The number of bytes read. Zero means end-of-stream, unless `length`
    /// was zero, in which case the drive is not consulted at all.
    pub fn read_slice(&mut self, buf: &mut [u8], offset: usize, length: usize) -> Result<usize, TapeError> {
        TapeError::check_bounds(buf.len(), offset, length)?;

        lock_core(&self.core)?.read(&mut buf[offset..offset + length])
    }

    /// Read a single byte, or `None` at end-of-stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>, TapeError> {
        let mut core = lock_core(&self.core)?;

        match core.read(&mut self.scratch)? {
            0 => Ok(None),
            _ => Ok(Some(self.scratch[0]))
        }
    }

    /// Close the device this view was taken from.
    pub fn close(&mut self) {
        close_core(&self.core);
    }
}

impl io::Read for DeviceInputView {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len();

        Ok(self.read_slice(buf, 0, len)?)
    }
}

impl DeviceOutputView {
    pub(crate) fn new(core: SharedCore) -> DeviceOutputView {
        DeviceOutputView {
            core: core,
            scratch: [0],
        }
    }

    /// Write all `length` bytes of `buf[offset..]` to the drive.
    ///
    /// Fails with `LogicalEndOfMedia` before touching the drive if the
    /// early warning has been reported and not overridden.
    pub fn write_slice(&mut self, buf: &[u8], offset: usize, length: usize) -> Result<(), TapeError> {
        TapeError::check_bounds(buf.len(), offset, length)?;

        lock_core(&self.core)?.write(&buf[offset..offset + length])
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), TapeError> {
        self.scratch[0] = byte;

        lock_core(&self.core)?.write(&self.scratch)
    }

    /// Close the device this view was taken from.
    pub fn close(&mut self) {
        close_core(&self.core);
    }
}

impl io::Write for DeviceOutputView {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_slice(buf, 0, buf.len())?;

        Ok(buf.len())
    }

    /// The device holds no buffered data of its own, so there is nothing to
    /// flush.
    fn flush(&mut self) -> io::Result<()> {
        lock_core(&self.core)?.ensure_open()?;

        Ok(())
    }
}
