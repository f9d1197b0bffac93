//! File and in-memory entry points.

use crate::config::CodecOptions;
use crate::container::{compress, decompress, CompressionStats, DecompressionStats};
use crate::error::{HuffError, Result};
use std::fs::{self, File};
use std::io::{self, Cursor, ErrorKind, Read, Seek, Write};
use std::path::Path;

/// Compresses the file at `src` into a new container at `dst`.
///
/// `dst` is created or truncated. A `dst` naming the same file as `src` is
/// refused before anything is truncated. If compression fails after `dst`
/// was opened, the partial file is removed.
pub fn compress_file(src: &Path, dst: &Path, options: &CodecOptions) -> Result<CompressionStats> {
    let mut input = File::open(src).map_err(HuffError::SourceUnreadable)?;
    ensure_distinct(src, dst)?;
    let mut output = File::create(dst).map_err(HuffError::SinkUnwritable)?;

    let result = compress(&mut input, &mut output, options);
    drop(output);
    if result.is_err() {
        remove_partial(dst);
    }
    result
}

/// Decompresses the container at `src` into a new file at `dst`.
///
/// `dst` is created or truncated. A `dst` naming the same file as `src` is
/// refused before anything is truncated. If decompression fails after `dst`
/// was opened, the partial file is removed.
pub fn decompress_file(
    src: &Path,
    dst: &Path,
    options: &CodecOptions,
) -> Result<DecompressionStats> {
    let mut input = File::open(src).map_err(HuffError::SourceUnreadable)?;
    ensure_distinct(src, dst)?;
    let mut output = File::create(dst).map_err(HuffError::SinkUnwritable)?;

    let result = decompress(&mut input, &mut output, options);
    drop(output);
    if result.is_err() {
        remove_partial(dst);
    }
    result
}

/// Fails if `dst` already exists and resolves to the same file as `src`.
fn ensure_distinct(src: &Path, dst: &Path) -> Result<()> {
    let Ok(dst_resolved) = fs::canonicalize(dst) else {
        return Ok(());
    };
    let src_resolved = fs::canonicalize(src).map_err(HuffError::SourceUnreadable)?;
    if src_resolved == dst_resolved {
        return Err(HuffError::SinkUnwritable(io::Error::new(
            ErrorKind::InvalidInput,
            format!("destination {} is the source file", dst.display()),
        )));
    }
    Ok(())
}

fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::warn!(path = %path.display(), "removed partial output"),
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "failed to remove partial output"
        ),
    }
}

/// Compresses a byte slice into a container held in memory.
pub fn compress_bytes(data: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let mut output = Cursor::new(Vec::new());
    compress(&mut Cursor::new(data), &mut output, options)?;
    Ok(output.into_inner())
}

/// Decompresses an in-memory container.
pub fn decompress_bytes(container: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress(&mut Cursor::new(container), &mut output, options)?;
    Ok(output)
}

/// A codec bound to a fixed set of options.
///
/// # Example
///
/// ```
/// use huffpack::Huffman;
///
/// let codec = Huffman::new();
/// let container = codec.compress_bytes(b"abracadabra")?;
/// assert_eq!(codec.decompress_bytes(&container)?, b"abracadabra");
/// # Ok::<(), huffpack::HuffError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Huffman {
    options: CodecOptions,
}

impl Huffman {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn compress<R, W>(&self, input: &mut R, output: &mut W) -> Result<CompressionStats>
    where
        R: Read + Seek,
        W: Write + Seek,
    {
        compress(input, output, &self.options)
    }

    pub fn decompress<R, W>(&self, input: &mut R, output: &mut W) -> Result<DecompressionStats>
    where
        R: Read + Seek,
        W: Write,
    {
        decompress(input, output, &self.options)
    }

    pub fn compress_file(&self, src: &Path, dst: &Path) -> Result<CompressionStats> {
        compress_file(src, dst, &self.options)
    }

    pub fn decompress_file(&self, src: &Path, dst: &Path) -> Result<DecompressionStats> {
        decompress_file(src, dst, &self.options)
    }

    pub fn compress_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        compress_bytes(data, &self.options)
    }

    pub fn decompress_bytes(&self, container: &[u8]) -> Result<Vec<u8>> {
        decompress_bytes(container, &self.options)
    }
}
