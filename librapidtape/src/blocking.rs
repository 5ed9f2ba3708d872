use std::io;
use std::io::Write;
use crate::error::TapeError;

/// Write implementation that ensures every write passed along to it's
/// interior writer is a whole number of fixed-size records.
///
/// Incoming data is collected in a buffer of `capacity` bytes. Each time the
/// buffer fills, all of it is handed to the inner writer in one call. On
/// `flush`, whatever is left is padded with zeroes up to the next record
/// boundary and written out, so the inner writer only ever sees multiples of
/// `record_size`, and every write but the last one after a flush is exactly
/// `capacity` bytes long.
pub struct FixedRecordWriter<W: Write> {
    record_size: usize,
    inner: W,
    block: Vec<u8>,
    capacity: usize,
}

impl<W: Write> FixedRecordWriter<W> {
    /// Construct a writer with a buffer of `capacity` bytes.
    ///
    /// Fails, without allocating the buffer, if either size is zero or if
    /// `capacity` is not a multiple of `record_size`.
    pub fn new(inner: W, record_size: usize, capacity: usize) -> Result<FixedRecordWriter<W>, TapeError> {
        if record_size == 0 {
            return Err(TapeError::Config("record size must be greater than zero".to_string()));
        }

        if capacity == 0 {
            return Err(TapeError::Config("buffer size must be greater than zero".to_string()));
        }

        if capacity % record_size != 0 {
            return Err(TapeError::Config(format!("buffer size {} is not a multiple of record size {}", capacity, record_size)));
        }

        Ok(FixedRecordWriter {
            record_size: record_size,
            inner: inner,
            block: Vec::with_capacity(capacity),
            capacity: capacity,
        })
    }

    /// Construct a writer whose buffer holds `factor` records.
    pub fn with_factor(inner: W, record_size: usize, factor: usize) -> Result<FixedRecordWriter<W>, TapeError> {
        let capacity = record_size.checked_mul(factor).ok_or_else(|| TapeError::Config("buffer size overflows".to_string()))?;

        FixedRecordWriter::new(inner, record_size, capacity)
    }

    pub fn record_size(&self) -> usize {
        self.record_size
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many bytes are waiting in the buffer.
    pub fn buffered(&self) -> usize {
        self.block.len()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Flush any buffered data (padding it out to a whole record) and hand
    /// back the inner writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;

        Ok(self.inner)
    }

    /// Attempts to fill the interior block with as much data as possible.
    ///
    /// # Returns
    ///
    /// The number of bytes taken from `buf`.
    fn fill_block(&mut self, buf: &[u8]) -> usize {
        let take = (self.capacity - self.block.len()).min(buf.len());

        self.block.extend_from_slice(&buf[..take]);

        take
    }

    /// Hand the buffered bytes to the inner writer in one call.
    ///
    /// Is a null-operation if nothing is buffered. The buffer is only emptied
    /// if the write succeeded.
    fn empty_block(&mut self) -> io::Result<()> {
        if !self.block.is_empty() {
            self.inner.write_all(&self.block)?;
            self.block.clear();
        }

        Ok(())
    }
}

impl<W: Write> Write for FixedRecordWriter<W> {
    /// Buffer and pass along as much of `buf` as the inner writer allows.
    ///
    /// If the inner writer fails after some of `buf` has already been taken
    /// (sent on, or held in the block buffer), the error is dropped and the
    /// count taken so far is returned. The next call reports it again, once
    /// nothing of the new buffer has been taken.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut consumed = 0;

        while consumed < buf.len() {
            if self.block.len() == self.capacity {
                if let Err(e) = self.empty_block() {
                    return if consumed > 0 { Ok(consumed) } else { Err(e) };
                }
            }

            //Optimization: If the block buffer is empty, hand whole buffers'
            //worth of the incoming data straight to the inner writer.
            if self.block.is_empty() && buf.len() - consumed >= self.capacity {
                if let Err(e) = self.inner.write_all(&buf[consumed..consumed + self.capacity]) {
                    return if consumed > 0 { Ok(consumed) } else { Err(e) };
                }

                consumed += self.capacity;
                continue;
            }

            consumed += self.fill_block(&buf[consumed..]);
        }

        Ok(consumed)
    }

    /// Flush the output stream, ensuring that all intermediately buffered
    /// contents reach their destination.
    ///
    /// Since this is a record-based writer, calling flush() may cause zeroes
    /// to be inserted into the resulting stream, up to the next record
    /// boundary. The alternative was to not flush intermediary contents,
    /// which would leave a partial record no tape drive will accept.
    fn flush(&mut self) -> io::Result<()> {
        let partial = self.block.len() % self.record_size;
        if partial != 0 {
            let padded = self.block.len() + self.record_size - partial;
            self.block.resize(padded, 0);
        }

        self.empty_block()?;
        self.inner.flush()
    }
}
