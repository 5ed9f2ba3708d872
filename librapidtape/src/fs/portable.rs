use std::{io, fs, path};
use crate::error::TapeError;
use crate::tape::{TapeDevice, TapeDriver, DriverOpener};
use crate::tape::emulated::EmulatedTape;
use crate::tuning::Configuration;

/// Opens ordinary files as emulated tapes.
///
/// The file must already exist and be both readable and writable.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmulatedOpener;

impl DriverOpener for EmulatedOpener {
    fn open(&self, path: &path::Path) -> io::Result<Box<dyn TapeDriver>> {
        let file = fs::OpenOptions::new().read(true).write(true).open(path)?;

        Ok(Box::new(EmulatedTape::new(file)))
    }
}

/// The opener for this platform.
///
/// # Platform considerations
///
/// This is the portable version of the function. Since portable tape access
/// isn't a thing that makes sense, it only opens files as emulated tapes.
pub fn platform_opener() -> EmulatedOpener {
    EmulatedOpener
}

/// Open a tape device by name with this platform's opener.
///
/// # Platform considerations
///
/// This is the portable version of the function. It supports emulated tapes
/// in regular files only.
pub fn open_tape<P: AsRef<path::Path>>(tapedev: P, tuning: &Configuration) -> Result<TapeDevice, TapeError> {
    TapeDevice::open(&platform_opener(), tapedev, tuning)
}
