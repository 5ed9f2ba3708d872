//! Tape emulation on top of ordinary seekable storage.

use std::io;
use std::io::{Read, Write, Seek, SeekFrom};
use crate::tape::{TapeDriver, ReadStatus, WriteStatus};

/// Emulate a fixed-block tape drive on a normal reader/writer.
///
/// Positioning maps onto `Seek`: rewinding seeks to the start and spacing to
/// end-of-data seeks to the end of the store. Tape conditions that a plain
/// file cannot record are configured up front:
///
///  - File marks sit at fixed byte positions. A read that arrives at one
///    reports `FileMark` once and then carries on past it.
///  - The early warning starts at a fixed byte position. The first write at
///    or beyond it is refused with `EarlyWarning(0)`; later writes go through
///    until the next rewind.
///  - A capacity limits how far the store may grow, after which writes fail
///    the way a drive at physical end of tape does.
///  - A transfer limit caps how many bytes a single read or write moves, to
///    exercise callers' handling of short transfers.
///
/// Writing does not truncate data recorded after the write position.
pub struct EmulatedTape<S> {
    store: S,
    block_size: usize,
    file_marks: Vec<u64>,
    reported_mark: Option<u64>,
    early_warning: Option<u64>,
    warned: bool,
    capacity: Option<u64>,
    max_transfer: Option<usize>,
}

impl<S> EmulatedTape<S> where S: Read + Write + Seek + Send {
    pub fn new(store: S) -> EmulatedTape<S> {
        EmulatedTape {
            store: store,
            block_size: 512,
            file_marks: Vec::new(),
            reported_mark: None,
            early_warning: None,
            warned: false,
            capacity: None,
            max_transfer: None,
        }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_file_marks(mut self, mut positions: Vec<u64>) -> Self {
        positions.sort();
        positions.dedup();

        self.file_marks = positions;
        self
    }

    pub fn with_early_warning(mut self, position: u64) -> Self {
        self.early_warning = Some(position);
        self
    }

    pub fn with_capacity(mut self, bytes: u64) -> Self {
        self.capacity = Some(bytes);
        self
    }

    pub fn with_max_transfer(mut self, bytes: usize) -> Self {
        self.max_transfer = Some(bytes);
        self
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn transfer_len(&self, requested: usize) -> usize {
        match self.max_transfer {
            Some(max) => requested.min(max),
            None => requested
        }
    }
}

impl<S> TapeDriver for EmulatedTape<S> where S: Read + Write + Seek + Send {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<ReadStatus> {
        let pos = self.store.stream_position()?;

        if self.file_marks.binary_search(&pos).is_ok() && self.reported_mark != Some(pos) {
            self.reported_mark = Some(pos);
            return Ok(ReadStatus::FileMark);
        }

        let mut len = self.transfer_len(buf.len());
        if let Some(next_mark) = self.file_marks.iter().find(|&&mark| mark > pos) {
            len = len.min((next_mark - pos) as usize);
        }

        match self.store.read(&mut buf[..len])? {
            0 => Ok(ReadStatus::EndOfData),
            n => Ok(ReadStatus::Data(n))
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<WriteStatus> {
        let pos = self.store.stream_position()?;

        if let Some(warning) = self.early_warning {
            if pos >= warning && !self.warned {
                self.warned = true;
                return Ok(WriteStatus::EarlyWarning(0));
            }
        }

        let mut len = self.transfer_len(buf.len());
        if let Some(capacity) = self.capacity {
            let room = capacity.saturating_sub(pos);
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "physical end of medium"));
            }

            len = len.min(room as usize);
        }

        self.reported_mark = None;

        Ok(WriteStatus::Accepted(self.store.write(&buf[..len])?))
    }

    fn block_size(&mut self) -> io::Result<usize> {
        Ok(self.block_size)
    }

    fn set_block_size(&mut self, size: usize) -> io::Result<()> {
        if size == 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "variable block mode is not supported"));
        }

        self.block_size = size;
        Ok(())
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.store.seek(SeekFrom::Start(0))?;
        self.reported_mark = None;
        self.warned = false;

        Ok(())
    }

    fn space_to_end_of_data(&mut self) -> io::Result<()> {
        self.store.seek(SeekFrom::End(0))?;
        self.reported_mark = None;

        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.store.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::io::Cursor;
    use crate::tape::{TapeDriver, ReadStatus, WriteStatus};
    use crate::tape::emulated::EmulatedTape;

    #[test]
    fn file_mark_reported_once() {
        let mut tape = EmulatedTape::new(Cursor::new(vec![1; 12])).with_file_marks(vec![8]);
        let mut buf = [0; 16];

        assert_eq!(tape.read(&mut buf).unwrap(), ReadStatus::Data(8));
        assert_eq!(tape.read(&mut buf).unwrap(), ReadStatus::FileMark);
        assert_eq!(tape.read(&mut buf).unwrap(), ReadStatus::Data(4));
        assert_eq!(tape.read(&mut buf).unwrap(), ReadStatus::EndOfData);
    }

    #[test]
    fn file_mark_seen_again_after_rewind() {
        let mut tape = EmulatedTape::new(Cursor::new(vec![1; 4])).with_file_marks(vec![0]);
        let mut buf = [0; 16];

        assert_eq!(tape.read(&mut buf).unwrap(), ReadStatus::FileMark);
        tape.rewind().unwrap();
        assert_eq!(tape.read(&mut buf).unwrap(), ReadStatus::FileMark);
    }

    #[test]
    fn short_transfers() {
        let mut tape = EmulatedTape::new(Cursor::new(vec![])).with_max_transfer(3);

        assert_eq!(tape.write(&[9; 10]).unwrap(), WriteStatus::Accepted(3));
        tape.rewind().unwrap();

        let mut buf = [0; 10];
        assert_eq!(tape.read(&mut buf).unwrap(), ReadStatus::Data(3));
    }

    #[test]
    fn early_warning_once_per_pass() {
        let mut tape = EmulatedTape::new(Cursor::new(vec![])).with_early_warning(4);

        assert_eq!(tape.write(&[1; 4]).unwrap(), WriteStatus::Accepted(4));
        assert_eq!(tape.write(&[2; 4]).unwrap(), WriteStatus::EarlyWarning(0));
        assert_eq!(tape.write(&[2; 4]).unwrap(), WriteStatus::Accepted(4));
    }

    #[test]
    fn capacity_is_physical_end() {
        let mut tape = EmulatedTape::new(Cursor::new(vec![])).with_capacity(6);

        assert_eq!(tape.write(&[1; 4]).unwrap(), WriteStatus::Accepted(4));
        assert_eq!(tape.write(&[1; 4]).unwrap(), WriteStatus::Accepted(2));
        assert_eq!(tape.write(&[1; 4]).unwrap_err().kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn space_to_end_appends() {
        let mut tape = EmulatedTape::new(Cursor::new(vec![5; 8]));

        tape.space_to_end_of_data().unwrap();
        tape.write(&[6; 2]).unwrap();

        assert_eq!(tape.into_inner().into_inner().len(), 10);
    }

    #[test]
    fn variable_block_mode_rejected() {
        let mut tape = EmulatedTape::new(Cursor::new(vec![]));

        assert_eq!(tape.set_block_size(0).unwrap_err().kind(), io::ErrorKind::InvalidInput);
        tape.set_block_size(1024).unwrap();
        assert_eq!(tape.block_size().unwrap(), 1024);
    }
}
