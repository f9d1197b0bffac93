//! MSB-first bit packing for the payload section.

use crate::code_book::{Code, CodeBook};
use crate::error::{HuffError, Result};
use crate::tree::{HuffmanTree, NodeKind};
use std::io::{self, BufRead, ErrorKind, Read, Write};

/// Accumulates bits most-significant first and flushes whole bytes.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    buffer: u8,
    filled: u8,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: 0,
            filled: 0,
            bytes_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.buffer = (self.buffer << 1) | u8::from(bit);
        self.filled += 1;
        if self.filled == 8 {
            self.inner.write_all(&[self.buffer])?;
            self.bytes_written += 1;
            self.buffer = 0;
            self.filled = 0;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for &bit in code.bits() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Whole bytes flushed so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Pads and flushes a partial byte.
    ///
    /// Returns the number of zero padding bits (0 to 7) and the total bytes written.
    pub fn finish(mut self) -> io::Result<PackedBits> {
        let mut garbage = 0;
        if self.filled > 0 {
            garbage = 8 - self.filled;
            let last = self.buffer << garbage;
            self.inner.write_all(&[last])?;
            self.bytes_written += 1;
        }
        Ok(PackedBits {
            garbage,
            bytes: self.bytes_written,
        })
    }
}

/// Outcome of packing a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedBits {
    /// Zero bits padding the last byte.
    pub garbage: u8,
    /// Payload length in bytes.
    pub bytes: u64,
}

/// Reads a fixed number of bits, most-significant first.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    unread_in_byte: u8,
    bits_left: u64,
}

impl<R: Read> BitReader<R> {
    /// Reads at most `bit_count` bits from `inner`.
    pub fn new(inner: R, bit_count: u64) -> Self {
        Self {
            inner,
            current: 0,
            unread_in_byte: 0,
            bits_left: bit_count,
        }
    }

    /// Next bit, or `None` once `bit_count` bits have been read.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.bits_left == 0 {
            return Ok(None);
        }
        if self.unread_in_byte == 0 {
            let mut byte = [0u8; 1];
            self.inner.read_exact(&mut byte)?;
            self.current = byte[0];
            self.unread_in_byte = 8;
        }
        self.unread_in_byte -= 1;
        self.bits_left -= 1;
        Ok(Some((self.current >> self.unread_in_byte) & 1 == 1))
    }

    pub fn bits_left(&self) -> u64 {
        self.bits_left
    }
}

/// Encodes every byte of `source` with `book` into `sink`.
///
/// A byte without a code means the source no longer matches the histogram
/// the book was built from, and fails with [`HuffError::SourceUnreadable`].
pub fn pack<R: BufRead, W: Write>(mut source: R, book: &CodeBook, sink: W) -> Result<PackedBits> {
    let mut writer = BitWriter::new(sink);
    loop {
        let chunk = match source.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(HuffError::SourceUnreadable(e)),
        };
        if chunk.is_empty() {
            break;
        }
        for &byte in chunk {
            let code = book.get(byte).ok_or_else(|| {
                HuffError::SourceUnreadable(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("input changed between passes: byte {byte:#04x} was not counted"),
                ))
            })?;
            writer.write_code(code).map_err(HuffError::SinkUnwritable)?;
        }
        let consumed = chunk.len();
        source.consume(consumed);
    }
    writer.finish().map_err(HuffError::SinkUnwritable)
}

/// Decodes exactly `payload_bits` bits from `source` by walking `tree`.
///
/// Returns the number of bytes written to `sink`. A tree that is a lone leaf
/// emits its byte once per bit.
pub fn unpack<R: Read, W: Write>(
    tree: &HuffmanTree,
    source: R,
    payload_bits: u64,
    mut sink: W,
) -> Result<u64> {
    let Some(root) = tree.root() else {
        if payload_bits == 0 {
            return Ok(0);
        }
        return Err(HuffError::corrupt_tree(format!(
            "empty tree with {payload_bits} payload bit(s)"
        )));
    };

    let mut reader = BitReader::new(source, payload_bits);
    let mut emitted = 0u64;

    if let NodeKind::Leaf(byte) = tree.nodes[root].kind {
        while read_bit(&mut reader)?.is_some() {
            sink.write_all(&[byte]).map_err(HuffError::SinkUnwritable)?;
            emitted += 1;
        }
        return Ok(emitted);
    }

    let mut cursor = root;
    while let Some(bit) = read_bit(&mut reader)? {
        let Some((left, right)) = tree.nodes[cursor].children() else {
            return Err(HuffError::corrupt_tree("decoder cursor rests on a leaf"));
        };
        let next = if bit { right } else { left };
        match tree.nodes[next].kind {
            NodeKind::Leaf(byte) => {
                sink.write_all(&[byte]).map_err(HuffError::SinkUnwritable)?;
                emitted += 1;
                cursor = root;
            }
            NodeKind::Internal { .. } => cursor = next,
        }
    }

    if cursor != root {
        return Err(HuffError::corrupt_payload(
            "payload ends in the middle of a code",
        ));
    }
    Ok(emitted)
}

fn read_bit<R: Read>(reader: &mut BitReader<R>) -> Result<Option<bool>> {
    reader.read_bit().map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            HuffError::corrupt_payload(format!(
                "payload ends with {} bit(s) still expected",
                reader.bits_left()
            ))
        } else {
            HuffError::SourceUnreadable(e)
        }
    })
}
