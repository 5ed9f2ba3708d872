//! Unix-specific device opening.

use std::{io, fs, path};
use std::os::unix::fs::FileTypeExt;
use crate::error::TapeError;
use crate::tape::{TapeDevice, TapeDriver, DriverOpener};
use crate::tuning::Configuration;

pub use crate::fs::portable::EmulatedOpener;

/// Opens tape devices on Unix.
///
/// Regular files are emulated tapes. Native tape drives (character devices)
/// are refused until a driver for them is built in.
#[derive(Copy, Clone, Debug, Default)]
pub struct UnixOpener;

impl DriverOpener for UnixOpener {
    fn open(&self, path: &path::Path) -> io::Result<Box<dyn TapeDriver>> {
        let metadata = fs::metadata(path)?;

        //This assumes all character devices are tapes.
        if metadata.file_type().is_char_device() {
            return Err(io::Error::new(io::ErrorKind::Other, "native tape control not available"));
        }

        EmulatedOpener.open(path)
    }
}

/// The opener for this platform.
///
/// # Platform considerations
///
/// This is the UNIX version of the function. It distinguishes tape drives
/// from image files.
pub fn platform_opener() -> UnixOpener {
    UnixOpener
}

/// Open a tape device by name with this platform's opener.
///
/// For more information, please see `fs::portable::open_tape`.
pub fn open_tape<P: AsRef<path::Path>>(tapedev: P, tuning: &Configuration) -> Result<TapeDevice, TapeError> {
    TapeDevice::open(&platform_opener(), tapedev, tuning)
}

#[cfg(test)]
mod tests {
    use std::io;
    use crate::error::TapeError;
    use crate::fs::unix::open_tape;
    use crate::tuning::Configuration;

    #[test]
    fn character_devices_refused() {
        match open_tape("/dev/null", &Configuration::default()) {
            Err(TapeError::Open { source, .. }) => assert_eq!(source.kind(), io::ErrorKind::Other),
            Err(e) => panic!("expected open error, got {:?}", e),
            Ok(_) => panic!("/dev/null should not open as a tape"),
        }
    }
}
