//! Tape devices and the driver contract they sit on top of.

use std::{io, path};

pub mod state;
pub mod device;
pub mod view;
pub mod emulated;

pub use self::device::TapeDevice;
pub use self::view::{DeviceInputView, DeviceOutputView};
pub use self::state::{MediaState, OverridePolicy};

/// Outcome of a single driver read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReadStatus {
    /// This many bytes were placed at the start of the buffer. Zero is
    /// treated the same as `EndOfData`.
    Data(usize),

    /// The read ran into a file mark. The drive is positioned past the mark.
    FileMark,

    /// Nothing more is recorded on the medium.
    EndOfData,
}

/// Outcome of a single driver write.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WriteStatus {
    /// This many bytes from the start of the buffer reached the drive.
    Accepted(usize),

    /// The drive is inside the early-warning area near the end of the
    /// medium. This many bytes were still accepted, possibly zero.
    EarlyWarning(usize),
}

/// Primitive operations on an open tape device.
///
/// Implementations wrap whatever the platform offers for tape control. All
/// calls block until the drive is done; `rewind` and `space_to_end_of_data`
/// in particular can take minutes on real hardware and cannot be cancelled.
///
/// # Conditions
///
/// Only the driver can tell a file mark apart from the end of recorded data,
/// or notice the early warning near the end of the medium. It reports those
/// through `ReadStatus::FileMark` and `WriteStatus::EarlyWarning`. Callers
/// must not infer either condition from byte counts.
pub trait TapeDriver: Send {
    /// Read up to `buf.len()` bytes. A read never crosses a file mark.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<ReadStatus>;

    /// Write some prefix of `buf`. Short writes are allowed.
    fn write(&mut self, buf: &[u8]) -> io::Result<WriteStatus>;

    /// The drive's current fixed block size.
    fn block_size(&mut self) -> io::Result<usize>;

    fn set_block_size(&mut self, size: usize) -> io::Result<()>;

    /// Seek to the start of the medium.
    fn rewind(&mut self) -> io::Result<()>;

    /// Seek just past the last recorded data, ready for appending.
    fn space_to_end_of_data(&mut self) -> io::Result<()>;

    /// Release the underlying handle. Called exactly once.
    fn close(&mut self) -> io::Result<()>;
}

impl<T: TapeDriver + ?Sized> TapeDriver for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<ReadStatus> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<WriteStatus> {
        (**self).write(buf)
    }

    fn block_size(&mut self) -> io::Result<usize> {
        (**self).block_size()
    }

    fn set_block_size(&mut self, size: usize) -> io::Result<()> {
        (**self).set_block_size(size)
    }

    fn rewind(&mut self) -> io::Result<()> {
        (**self).rewind()
    }

    fn space_to_end_of_data(&mut self) -> io::Result<()> {
        (**self).space_to_end_of_data()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Capability object that knows how to open drivers for one platform.
///
/// Which opener a program uses is decided when it is built (see
/// `fs::platform_opener`) or passed in explicitly, never guessed at runtime.
pub trait DriverOpener {
    fn open(&self, path: &path::Path) -> io::Result<Box<dyn TapeDriver>>;
}
