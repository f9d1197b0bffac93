use crate::error::{HuffError, Result};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom};

/// Number of distinct byte values.
pub const ALPHABET_SIZE: usize = 256;

/// Histogram of byte occurrences over one input.
///
/// The sum of all counts always equals the number of bytes recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Creates a table with every count at zero.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Counts every byte of an in-memory slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.record(data);
        table
    }

    /// Counts every byte of a seekable source, then rewinds it to the start.
    ///
    /// This is the first of the two passes over the input; the bit packer
    /// reads the same bytes again afterwards.
    pub fn from_reader<R: Read + Seek>(reader: &mut R, buffer_capacity: usize) -> Result<Self> {
        reader
            .seek(SeekFrom::Start(0))
            .map_err(HuffError::SourceUnreadable)?;

        let mut table = Self::new();
        let mut buffered = BufReader::with_capacity(buffer_capacity, &mut *reader);
        loop {
            let chunk = match buffered.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HuffError::SourceUnreadable(e)),
            };
            if chunk.is_empty() {
                break;
            }
            table.record(chunk);
            let consumed = chunk.len();
            buffered.consume(consumed);
        }
        drop(buffered);

        reader
            .seek(SeekFrom::Start(0))
            .map_err(HuffError::SourceUnreadable)?;
        Ok(table)
    }

    /// Adds the bytes of `data` to the histogram.
    pub fn record(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Total number of bytes recorded.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of byte values with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Returns the byte value if it is the only one present.
    pub fn single_symbol(&self) -> Option<u8> {
        let mut present = self.present();
        match (present.next(), present.next()) {
            (Some((byte, _)), None) => Some(byte),
            _ => None,
        }
    }

    /// Iterates `(byte, count)` for present bytes in ascending byte order.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
