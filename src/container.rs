//! On-disk container layout.
//!
//! | Offset        | Size      | Field                                   |
//! |---------------|-----------|-----------------------------------------|
//! | 0             | 2         | magic `AB`                              |
//! | 2             | 2         | `garbage << 13 \| tree_size`, big-endian |
//! | 4             | tree_size | pre-order escaped tree                  |
//! | 4 + tree_size | rest      | packed payload                          |

use crate::bits::{pack, unpack};
use crate::builder::build_tree;
use crate::code_book::CodeBook;
use crate::config::{CodecOptions, SingleSymbolPolicy};
use crate::error::{HuffError, Result};
use crate::frequency::FrequencyTable;
use crate::serialize::{read_tree, tree_bytes};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};

/// Format fingerprint written at the start of every container.
pub const MAGIC: [u8; 2] = *b"AB";

/// Bytes occupied by magic and header.
pub const PREAMBLE_LEN: u64 = 4;

/// Largest garbage count the header can carry (3 bits).
pub const MAX_GARBAGE: u8 = 0x07;

/// Largest tree size the header can carry (13 bits).
pub const MAX_TREE_SIZE: usize = 0x1FFF;

const TREE_SIZE_BITS: u32 = 13;

/// The packed 16-bit container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    garbage: u8,
    tree_size: u16,
}

impl Header {
    pub fn new(garbage: u8, tree_size: usize) -> Result<Self> {
        if garbage > MAX_GARBAGE || tree_size > MAX_TREE_SIZE {
            return Err(HuffError::HeaderOverflow { garbage, tree_size });
        }
        Ok(Self {
            garbage,
            tree_size: tree_size as u16,
        })
    }

    pub fn garbage(&self) -> u8 {
        self.garbage
    }

    pub fn tree_size(&self) -> usize {
        usize::from(self.tree_size)
    }

    /// Big-endian `garbage << 13 | tree_size`.
    pub fn pack(&self) -> [u8; 2] {
        let word = (u16::from(self.garbage) << TREE_SIZE_BITS) | self.tree_size;
        word.to_be_bytes()
    }

    pub fn unpack(bytes: [u8; 2]) -> Self {
        let word = u16::from_be_bytes(bytes);
        Self {
            garbage: (word >> TREE_SIZE_BITS) as u8,
            tree_size: word & MAX_TREE_SIZE as u16,
        }
    }
}

/// Statistics about one compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    /// Bytes read from the source
    pub input_len: u64,
    /// Bytes written to the container, preamble included
    pub output_len: u64,
    /// Distinct byte values in the source
    pub distinct_symbols: usize,
    /// Serialized tree length
    pub tree_size: usize,
    /// Padding bits in the last payload byte
    pub garbage_bits: u8,
}

impl CompressionStats {
    /// Returns the container size as a percentage of the input size.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_len == 0 {
            0.0
        } else {
            (self.output_len as f64 / self.input_len as f64) * 100.0
        }
    }
}

/// Statistics about one decompression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressionStats {
    /// Bytes written to the sink
    pub output_len: u64,
    /// Serialized tree length from the header
    pub tree_size: usize,
    /// Padding bits from the header
    pub garbage_bits: u8,
    /// Payload bits decoded
    pub payload_bits: u64,
}

/// Compresses the whole of `input` into a container written to `output`.
///
/// The input is read twice: once to count frequencies and once to pack the
/// payload. The container is written at the current position of `output`,
/// whose header is patched in place once the payload is known; `output` is
/// left positioned at the end of the container.
///
/// Bytes already present in `output` past the end of the container are not
/// removed. [`decompress`] reads to the end of its source, so callers reusing
/// a sink must truncate it at the returned position.
pub fn compress<R, W>(
    input: &mut R,
    output: &mut W,
    options: &CodecOptions,
) -> Result<CompressionStats>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let frequencies = FrequencyTable::from_reader(input, options.buffer_capacity)?;
    if let (Some(byte), SingleSymbolPolicy::Reject) =
        (frequencies.single_symbol(), options.single_symbol)
    {
        return Err(HuffError::DegenerateAlphabet(byte));
    }

    let tree = build_tree(&frequencies);
    let book = CodeBook::from_tree(&tree);
    let tree_data = tree_bytes(&tree);
    // Validates the tree size before anything is written.
    Header::new(0, tree_data.len())?;

    let start = output
        .stream_position()
        .map_err(HuffError::SinkUnwritable)?;

    let mut sink = BufWriter::with_capacity(options.buffer_capacity, &mut *output);
    sink.write_all(&MAGIC).map_err(HuffError::SinkUnwritable)?;
    sink.write_all(&[0, 0]).map_err(HuffError::SinkUnwritable)?;
    sink.write_all(&tree_data).map_err(HuffError::SinkUnwritable)?;

    let source = BufReader::with_capacity(options.buffer_capacity, &mut *input);
    let packed = pack(source, &book, &mut sink)?;
    sink.into_inner()
        .map_err(|e| HuffError::SinkUnwritable(e.into_error()))?;

    let stats = CompressionStats {
        input_len: frequencies.total(),
        output_len: PREAMBLE_LEN + tree_data.len() as u64 + packed.bytes,
        distinct_symbols: frequencies.distinct(),
        tree_size: tree_data.len(),
        garbage_bits: packed.garbage,
    };

    let header = Header::new(packed.garbage, tree_data.len())?;
    output
        .seek(SeekFrom::Start(start + 2))
        .and_then(|_| output.write_all(&header.pack()))
        .and_then(|_| output.seek(SeekFrom::Start(start + stats.output_len)))
        .and_then(|_| output.flush())
        .map_err(HuffError::SinkUnwritable)?;

    tracing::debug!(
        input_len = stats.input_len,
        distinct = stats.distinct_symbols,
        tree_size = stats.tree_size,
        garbage = stats.garbage_bits,
        payload_len = packed.bytes,
        "compressed"
    );
    Ok(stats)
}

/// Reconstructs the original bytes from a container starting at the current
/// position of `input` and running to its end.
pub fn decompress<R, W>(
    input: &mut R,
    output: &mut W,
    options: &CodecOptions,
) -> Result<DecompressionStats>
where
    R: Read + Seek,
    W: Write,
{
    let start = input
        .stream_position()
        .map_err(HuffError::SourceUnreadable)?;
    let end = input
        .seek(SeekFrom::End(0))
        .and_then(|end| input.seek(SeekFrom::Start(start)).map(|_| end))
        .map_err(HuffError::SourceUnreadable)?;
    let container_len = end.saturating_sub(start);
    if container_len < PREAMBLE_LEN {
        return Err(HuffError::Truncated);
    }

    let mut source = BufReader::with_capacity(options.buffer_capacity, &mut *input);
    let mut preamble = [0u8; 4];
    source.read_exact(&mut preamble).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => HuffError::Truncated,
        _ => HuffError::SourceUnreadable(e),
    })?;

    let magic = [preamble[0], preamble[1]];
    if options.verify_magic && magic != MAGIC {
        return Err(HuffError::BadMagic(magic));
    }
    let header = Header::unpack([preamble[2], preamble[3]]);

    let payload_len = container_len
        .checked_sub(PREAMBLE_LEN + header.tree_size() as u64)
        .ok_or_else(|| {
            HuffError::corrupt_tree(format!(
                "tree size {} runs past the end of a {container_len} byte container",
                header.tree_size()
            ))
        })?;
    let payload_bits = (payload_len * 8)
        .checked_sub(u64::from(header.garbage()))
        .ok_or_else(|| {
            HuffError::corrupt_payload(format!(
                "{} garbage bit(s) with an empty payload",
                header.garbage()
            ))
        })?;

    let mut budget = header.tree_size();
    let tree = read_tree(&mut source, &mut budget)?;
    if budget != 0 {
        return Err(HuffError::corrupt_tree(format!(
            "{budget} unused byte(s) in tree section"
        )));
    }

    let mut sink = BufWriter::with_capacity(options.buffer_capacity, &mut *output);
    let output_len = unpack(&tree, &mut source, payload_bits, &mut sink)?;
    sink.flush().map_err(HuffError::SinkUnwritable)?;

    let stats = DecompressionStats {
        output_len,
        tree_size: header.tree_size(),
        garbage_bits: header.garbage(),
        payload_bits,
    };
    tracing::debug!(
        output_len,
        tree_size = stats.tree_size,
        garbage = stats.garbage_bits,
        payload_bits,
        "decompressed"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn compress_vec(data: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
        let mut output = Cursor::new(Vec::new());
        compress(&mut Cursor::new(data), &mut output, options)?;
        Ok(output.into_inner())
    }

    fn decompress_vec(container: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        decompress(&mut Cursor::new(container), &mut output, options)?;
        Ok(output)
    }

    #[test]
    fn test_header_packing() {
        let header = Header::new(1, 5).unwrap();
        assert_eq!(header.pack(), [0x20, 0x05]);
        assert_eq!(Header::unpack([0x20, 0x05]), header);

        let full = Header::new(7, MAX_TREE_SIZE).unwrap();
        assert_eq!(full.pack(), [0xFF, 0xFF]);
        assert_eq!(Header::unpack([0xFF, 0xFF]), full);
    }

    #[test]
    fn test_header_overflow() {
        assert!(matches!(
            Header::new(8, 0),
            Err(HuffError::HeaderOverflow { garbage: 8, .. })
        ));
        assert!(matches!(
            Header::new(0, 8192),
            Err(HuffError::HeaderOverflow { tree_size: 8192, .. })
        ));
    }

    #[test]
    fn test_scenario_a_bytes() {
        let options = CodecOptions::default();
        let container = compress_vec(b"AAAAABBBCC", &options).unwrap();
        assert_eq!(
            container,
            vec![0x41, 0x42, 0x20, 0x05, b'*', b'*', b'C', b'B', b'A', 0xFA, 0xA0]
        );
        assert_eq!(decompress_vec(&container, &options).unwrap(), b"AAAAABBBCC");
    }

    #[test]
    fn test_scenario_b_empty() {
        let options = CodecOptions::default();
        let container = compress_vec(b"", &options).unwrap();
        assert_eq!(container, vec![0x41, 0x42, 0x00, 0x00]);
        assert!(decompress_vec(&container, &options).unwrap().is_empty());
    }

    #[test]
    fn test_scenario_c_single_symbol() {
        let options = CodecOptions::default();
        let container = compress_vec(b"ZZZZZZZZZZ", &options).unwrap();
        assert_eq!(container, vec![0x41, 0x42, 0xC0, 0x01, b'Z', 0x00, 0x00]);
        assert_eq!(decompress_vec(&container, &options).unwrap(), b"ZZZZZZZZZZ");
    }

    #[test]
    fn test_scenario_c_rejected() {
        let options = CodecOptions::new().single_symbol(SingleSymbolPolicy::Reject);
        let err = compress_vec(b"ZZZZZZZZZZ", &options).unwrap_err();
        assert!(matches!(err, HuffError::DegenerateAlphabet(b'Z')));
    }

    #[test]
    fn test_stats() {
        let mut output = Cursor::new(Vec::new());
        let stats = compress(
            &mut Cursor::new(b"AAAAABBBCC"),
            &mut output,
            &CodecOptions::default(),
        )
        .unwrap();
        assert_eq!(
            stats,
            CompressionStats {
                input_len: 10,
                output_len: 11,
                distinct_symbols: 3,
                tree_size: 5,
                garbage_bits: 1,
            }
        );
        assert!((stats.compression_ratio() - 110.0).abs() < 1e-9);

        let container = output.into_inner();
        let mut restored = Vec::new();
        let stats = decompress(
            &mut Cursor::new(&container),
            &mut restored,
            &CodecOptions::default(),
        )
        .unwrap();
        assert_eq!(stats.output_len, 10);
        assert_eq!(stats.payload_bits, 15);
    }

    #[test]
    fn test_container_after_prefix() {
        let mut output = Cursor::new(b"XYZ".to_vec());
        output.seek(SeekFrom::End(0)).unwrap();
        compress(&mut Cursor::new(b"abcabc"), &mut output, &CodecOptions::default()).unwrap();

        let mut input = Cursor::new(output.into_inner());
        assert_eq!(&input.get_ref()[..3], b"XYZ");
        input.set_position(3);
        let mut restored = Vec::new();
        decompress(&mut input, &mut restored, &CodecOptions::default()).unwrap();
        assert_eq!(restored, b"abcabc");
    }

    #[test]
    fn test_reused_sink_left_at_container_end() {
        let mut output = Cursor::new(vec![0xEE; 64]);
        let stats = compress(&mut Cursor::new(b"abcabc"), &mut output, &CodecOptions::default())
            .unwrap();
        assert_eq!(stats.output_len, 11);
        assert_eq!(output.position(), stats.output_len);

        // Stale bytes after the container stay until the caller truncates.
        let mut container = output.into_inner();
        assert_eq!(container[11..], [0xEE; 53]);
        container.truncate(stats.output_len as usize);

        let mut restored = Vec::new();
        decompress(&mut Cursor::new(&container), &mut restored, &CodecOptions::default())
            .unwrap();
        assert_eq!(restored, b"abcabc");
    }

    #[test]
    fn test_magic_not_checked_by_default() {
        let mut container = compress_vec(b"hello", &CodecOptions::default()).unwrap();
        container[0] = b'X';
        assert_eq!(
            decompress_vec(&container, &CodecOptions::default()).unwrap(),
            b"hello"
        );

        let strict = CodecOptions::new().verify_magic(true);
        assert!(matches!(
            decompress_vec(&container, &strict),
            Err(HuffError::BadMagic([b'X', b'B']))
        ));
    }

    #[test]
    fn test_truncated_container() {
        assert!(matches!(
            decompress_vec(b"AB\x00", &CodecOptions::default()),
            Err(HuffError::Truncated)
        ));
    }

    #[test]
    fn test_tree_size_past_end() {
        // tree_size 100 in a 6 byte container
        let container = [b'A', b'B', 0x00, 0x64, b'*', b'x'];
        assert!(matches!(
            decompress_vec(&container, &CodecOptions::default()),
            Err(HuffError::CorruptTree(_))
        ));
    }

    #[test]
    fn test_unused_tree_bytes() {
        // tree_size 2 but the tree is the single leaf 'x'
        let container = [b'A', b'B', 0x00, 0x02, b'x', b'y', 0x00];
        assert!(matches!(
            decompress_vec(&container, &CodecOptions::default()),
            Err(HuffError::CorruptTree(_))
        ));
    }

    #[test]
    fn test_garbage_without_payload() {
        let container = [b'A', b'B', 0x20, 0x01, b'x'];
        assert!(matches!(
            decompress_vec(&container, &CodecOptions::default()),
            Err(HuffError::CorruptPayload(_))
        ));
    }

    #[test]
    fn test_payload_without_tree() {
        let container = [b'A', b'B', 0x00, 0x00, 0xFF];
        assert!(matches!(
            decompress_vec(&container, &CodecOptions::default()),
            Err(HuffError::CorruptTree(_))
        ));
    }
}
