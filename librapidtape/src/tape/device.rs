//! Ownership and lifecycle of an open tape device.

use std::{io, path};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};
use crate::error::TapeError;
use crate::tape::{TapeDriver, DriverOpener, ReadStatus, WriteStatus};
use crate::tape::state::{MediaState, OverridePolicy};
use crate::tape::view::{DeviceInputView, DeviceOutputView};
use crate::tuning::Configuration;

/// State shared between a device and every view handed out from it.
///
/// The driver handle lives here as long as the device is open. Taking it out
/// is what closing means, so a closed device can never reach the driver
/// again.
pub(crate) struct DeviceCore {
    driver: Option<Box<dyn TapeDriver>>,
    state: MediaState,
    policy: OverridePolicy,
    max_write_stalls: usize,
}

pub(crate) type SharedCore = Arc<Mutex<DeviceCore>>;

/// Lock the shared device state for a fallible operation.
pub(crate) fn lock_core(core: &Mutex<DeviceCore>) -> Result<MutexGuard<DeviceCore>, TapeError> {
    core.lock().map_err(|_| TapeError::State("tape device lock poisoned"))
}

/// Lock the shared device state for closing, which must always succeed.
pub(crate) fn close_core(core: &Mutex<DeviceCore>) {
    core.lock().unwrap_or_else(PoisonError::into_inner).close();
}

impl DeviceCore {
    fn new(driver: Box<dyn TapeDriver>, tuning: &Configuration) -> DeviceCore {
        DeviceCore {
            driver: Some(driver),
            state: MediaState::Normal,
            policy: tuning.override_policy,
            max_write_stalls: tuning.max_write_stalls,
        }
    }

    fn driver_mut(&mut self) -> Result<&mut Box<dyn TapeDriver>, TapeError> {
        self.driver.as_mut().ok_or(TapeError::State("tape device is not open"))
    }

    pub(crate) fn ensure_open(&self) -> Result<(), TapeError> {
        match self.driver {
            Some(_) => Ok(()),
            None => Err(TapeError::State("tape device is not open"))
        }
    }

    pub(crate) fn close(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            debug!("closing tape device");

            if let Err(e) = driver.close() {
                warn!(error = %e, "tape device did not close cleanly");
            }
        }
    }

    /// Issue a single read to the driver.
    ///
    /// Short reads are returned as-is. Once a file mark has been reported the
    /// device keeps reporting end-of-stream until the mark is cleared.
    pub(crate) fn read(&mut self, buf: &mut [u8]) -> Result<usize, TapeError> {
        self.ensure_open()?;

        if buf.is_empty() || self.state.at_file_mark() {
            return Ok(0);
        }

        let request = buf.len();

        match self.driver_mut()?.read(buf)? {
            ReadStatus::Data(n) if n > 0 => Ok(n.min(request)),
            ReadStatus::Data(_) | ReadStatus::EndOfData => Ok(0),
            ReadStatus::FileMark => {
                warn!("tape drive reported a file mark");
                self.state = self.state.reach_file_mark();
                Ok(0)
            }
        }
    }

    /// Write all of `buf`, retrying whatever the driver did not accept.
    ///
    /// An early warning raised partway through does not stop the current
    /// write; it only blocks the ones after it.
    pub(crate) fn write(&mut self, buf: &[u8]) -> Result<(), TapeError> {
        self.ensure_open()?;

        if self.state.blocks_writes() {
            return Err(TapeError::LogicalEndOfMedia { written: 0 });
        }

        let mut written = 0;
        let mut stalls = 0;

        while written < buf.len() {
            let remain = buf.len() - written;
            let accepted = match self.driver_mut()?.write(&buf[written..])? {
                WriteStatus::Accepted(n) => n,
                WriteStatus::EarlyWarning(n) => {
                    warn!(written = written + n, "tape drive reached logical end of media");
                    self.state = self.state.reach_media_limit(self.policy);
                    n
                }
            }.min(remain);

            if accepted == 0 {
                stalls += 1;

                if stalls > self.max_write_stalls {
                    return Err(TapeError::Driver(io::Error::new(io::ErrorKind::WriteZero, "tape drive stopped accepting data")));
                }
            } else {
                stalls = 0;
            }

            written += accepted;
        }

        Ok(())
    }
}

impl Drop for DeviceCore {
    fn drop(&mut self) {
        self.close();
    }
}

/// An open tape device.
///
/// The device owns exactly one driver handle. The handle is released on the
/// first call to `close` (by the device or any of its views), or when the
/// device and all of its views have been dropped. Once closed, a device
/// cannot be reopened and every operation other than `close` fails.
///
/// All methods take `&self`; the media flags and the driver sit behind one
/// lock, which is held for the duration of each driver call.
pub struct TapeDevice {
    core: SharedCore,
}

impl TapeDevice {
    /// Open the device at `path` using the given platform opener.
    pub fn open<O, P>(opener: &O, path: P, tuning: &Configuration) -> Result<TapeDevice, TapeError> where O: DriverOpener + ?Sized, P: AsRef<path::Path> {
        let path = path.as_ref();

        match opener.open(path) {
            Ok(driver) => {
                debug!(path = %path.display(), "opened tape device");
                Ok(TapeDevice::from_driver(driver, tuning))
            },
            Err(source) => Err(TapeError::Open { path: path.to_path_buf(), source })
        }
    }

    /// Construct a device around a driver that has already been opened.
    pub fn from_driver(driver: Box<dyn TapeDriver>, tuning: &Configuration) -> TapeDevice {
        TapeDevice {
            core: Arc::new(Mutex::new(DeviceCore::new(driver, tuning)))
        }
    }

    /// Close the device. Closing an already closed device does nothing, and
    /// driver errors during close are logged rather than returned.
    pub fn close(&self) {
        close_core(&self.core);
    }

    pub fn is_open(&self) -> bool {
        lock_core(&self.core).map(|core| core.ensure_open().is_ok()).unwrap_or(false)
    }

    /// Obtain a reading handle onto this device.
    pub fn input_view(&self) -> Result<DeviceInputView, TapeError> {
        lock_core(&self.core)?.ensure_open()?;

        Ok(DeviceInputView::new(self.core.clone()))
    }

    /// Obtain a writing handle onto this device.
    pub fn output_view(&self) -> Result<DeviceOutputView, TapeError> {
        lock_core(&self.core)?.ensure_open()?;

        Ok(DeviceOutputView::new(self.core.clone()))
    }

    pub fn block_size(&self) -> Result<usize, TapeError> {
        Ok(lock_core(&self.core)?.driver_mut()?.block_size()?)
    }

    pub fn set_block_size(&self, size: usize) -> Result<(), TapeError> {
        debug!(size, "setting tape block size");

        Ok(lock_core(&self.core)?.driver_mut()?.set_block_size(size)?)
    }

    /// Seek to the start of the medium. Blocks until the drive is done.
    pub fn rewind(&self) -> Result<(), TapeError> {
        debug!("rewinding tape");

        Ok(lock_core(&self.core)?.driver_mut()?.rewind()?)
    }

    /// Seek past the last recorded data, for appending. Blocks until the
    /// drive is done.
    pub fn space_to_end_of_data(&self) -> Result<(), TapeError> {
        debug!("spacing tape to end of data");

        Ok(lock_core(&self.core)?.driver_mut()?.space_to_end_of_data()?)
    }

    /// Forget a file mark reported by an earlier read, so reading continues.
    ///
    /// This does not move the tape. The drive must already be positioned
    /// past the mark, which is where a read that hits one leaves it.
    pub fn clear_eof(&self) -> Result<(), TapeError> {
        let mut core = lock_core(&self.core)?;

        core.ensure_open()?;
        core.state = core.state.clear_file_mark()?;

        Ok(())
    }

    /// Allow writes past the logical end of media.
    ///
    /// How long the override lasts is set by the device's `OverridePolicy`.
    pub fn clear_eom(&self) -> Result<(), TapeError> {
        let mut core = lock_core(&self.core)?;

        core.ensure_open()?;
        core.state = core.state.override_media_limit()?;

        warn!("writing past logical end of media");

        Ok(())
    }

    pub fn media_state(&self) -> Result<MediaState, TapeError> {
        let core = lock_core(&self.core)?;

        core.ensure_open()?;

        Ok(core.state)
    }
}
