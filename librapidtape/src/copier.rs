//! Bulk copying between readers and writers.

use std::{io, ptr};
use std::io::{Read, Write};
use std::sync::Mutex;

const DEFAULT_BUF_SIZE : usize = 256;

/// Copies data from a reader to a writer through a single buffer.
///
/// Each read from the source is handed to the sink as one `write_all`, so
/// the buffer size is also the largest write the sink will see. If your
/// writer needs writes of a fixed size (e.g. it's a record oriented medium
/// like a tape drive), wrap it in [`FixedRecordWriter`] instead of relying
/// on the buffer size.
///
/// A copier holds only its settings; every call to `copy` starts afresh.
///
/// [`FixedRecordWriter`]: ../blocking/struct.FixedRecordWriter.html
#[derive(Copy, Clone, Debug)]
pub struct StreamCopier {
    buffer_size: usize,
    limit: u64,
}

impl Default for StreamCopier {
    fn default() -> Self {
        StreamCopier {
            buffer_size: DEFAULT_BUF_SIZE,
            limit: 0,
        }
    }
}

impl StreamCopier {
    pub fn new(buffer_size: usize) -> StreamCopier {
        StreamCopier {
            buffer_size: buffer_size,
            limit: 0,
        }
    }

    /// Stop once `limit` bytes have been written. A limit of zero means the
    /// copy runs until the source reports end-of-stream.
    pub fn with_limit(mut self, limit: u64) -> StreamCopier {
        self.limit = limit;
        self
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Copy from `source` to `sink` until end-of-stream or the byte limit.
    ///
    /// Neither endpoint is closed or flushed. The first read or write error
    /// is returned unchanged; interrupted reads are retried.
    ///
    /// # Returns
    ///
    /// The number of bytes written to `sink`, which never exceeds the limit.
    pub fn copy<R: ?Sized, W: ?Sized>(&self, source: &mut R, sink: &mut W) -> io::Result<u64> where R: Read, W: Write {
        if self.buffer_size == 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "copy buffer size must be greater than zero"));
        }

        let mut buffer = vec![0; self.buffer_size];
        let mut total_written : u64 = 0;

        loop {
            let mut want = buffer.len();

            if self.limit != 0 {
                if total_written >= self.limit {
                    break;
                }

                let remain = self.limit - total_written;
                if remain < want as u64 {
                    want = remain as usize;
                }
            }

            let bytes_read = match source.read(&mut buffer[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e)
            };

            sink.write_all(&buffer[..bytes_read])?;
            total_written += bytes_read as u64;
        }

        Ok(total_written)
    }

    /// Copy between two shared endpoints while holding both of them.
    ///
    /// The source is locked before the sink, so two copies between the same
    /// pair of endpoints in the same direction can never deadlock, and their
    /// bytes are never interleaved. There is no fairness between waiting
    /// copies.
    pub fn copy_shared<R: ?Sized, W: ?Sized>(&self, source: &Mutex<R>, sink: &Mutex<W>) -> io::Result<u64> where R: Read, W: Write {
        if ptr::eq(source as *const Mutex<R> as *const u8, sink as *const Mutex<W> as *const u8) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "cannot copy a stream onto itself"));
        }

        let mut source = source.lock().map_err(|_| io::Error::new(io::ErrorKind::Other, "copy source lock poisoned"))?;
        let mut sink = sink.lock().map_err(|_| io::Error::new(io::ErrorKind::Other, "copy sink lock poisoned"))?;

        self.copy(&mut *source, &mut *sink)
    }
}
