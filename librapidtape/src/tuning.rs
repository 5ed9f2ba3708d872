//! Performance tuning related configuration

use crate::tape::state::OverridePolicy;

#[derive(Copy, Clone, Debug)]
pub struct Configuration {
    /// Physical record size every buffered write is padded to.
    pub record_size: usize,
    /// Size of the record-aligned write buffer. Must be a multiple of
    /// `record_size`.
    pub buffer_capacity: usize,
    pub copy_buffer_size: usize,
    pub override_policy: OverridePolicy,
    /// How many zero-byte write acceptances in a row the device tolerates
    /// before giving up on a write.
    pub max_write_stalls: usize,
}

impl Configuration {
    /// Change the record size, keeping the buffer capacity a multiple of it.
    ///
    /// The capacity is rounded down to the nearest record boundary, but never
    /// below one record.
    pub fn with_record_size(mut self, record_size: usize) -> Self {
        self.record_size = record_size;

        if record_size > 0 {
            let records = self.buffer_capacity / record_size;
            self.buffer_capacity = record_size * records.max(1);
        }

        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            record_size: 20 * 512, //Compatibility with tars that read 10k records
            buffer_capacity: 1024 * 1024 / (20 * 512) * (20 * 512),
            copy_buffer_size: 64 * 1024,
            override_policy: OverridePolicy::Session,
            max_write_stalls: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tuning::Configuration;

    #[test]
    fn default_capacity_is_record_aligned() {
        let tuning = Configuration::default();

        assert_eq!(tuning.buffer_capacity % tuning.record_size, 0);
        assert!(tuning.buffer_capacity <= 1024 * 1024);
    }

    #[test]
    fn record_size_rounds_capacity_down() {
        let tuning = Configuration::default().with_record_size(3000);

        assert_eq!(tuning.record_size, 3000);
        assert_eq!(tuning.buffer_capacity % 3000, 0);
        assert!(tuning.buffer_capacity <= Configuration::default().buffer_capacity);
    }

    #[test]
    fn record_size_larger_than_capacity() {
        let tuning = Configuration::default().with_record_size(4 * 1024 * 1024);

        assert_eq!(tuning.buffer_capacity, 4 * 1024 * 1024);
    }
}
