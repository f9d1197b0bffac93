//! # huffpack - Byte-oriented Huffman compression
//!
//! Compresses arbitrary byte streams with a static Huffman code built from
//! the input's byte histogram, and restores them bit-exactly.
//!
//! A container holds:
//! 1. **Magic**: the two bytes `AB`
//! 2. **Header**: 3 bits of trailing padding and 13 bits of tree size, big-endian
//! 3. **Tree**: the code tree in pre-order, `*` for internal nodes, `\` escaping
//!    literal `*` and `\`
//! 4. **Payload**: the concatenated codes, packed most-significant bit first
//!
//! ## Example
//!
//! ```
//! use huffpack::{compress_bytes, decompress_bytes, CodecOptions};
//!
//! let options = CodecOptions::default();
//! let container = compress_bytes(b"AAAAABBBCC", &options)?;
//! assert_eq!(&container[..4], &[b'A', b'B', 0x20, 0x05]);
//!
//! let restored = decompress_bytes(&container, &options)?;
//! assert_eq!(restored, b"AAAAABBBCC");
//! # Ok::<(), huffpack::HuffError>(())
//! ```
//!
//! ## Performance
//!
//! - Two linear passes over the input when compressing, one when decompressing
//! - Tree construction is O(k log k) for k distinct bytes
//! - Tree nodes live in a generational arena (SlotMap)

mod bits;
mod builder;
mod code_book;
mod codec;
mod config;
mod container;
mod error;
mod frequency;
mod queue;
mod serialize;
mod tree;


pub use bits::{pack, unpack, BitReader, BitWriter, PackedBits};
pub use builder::{build_tree, build_tree_with};
pub use code_book::{Code, CodeBook};
pub use codec::{compress_bytes, compress_file, decompress_bytes, decompress_file, Huffman};
pub use config::{CodecOptions, SingleSymbolPolicy, DEFAULT_BUFFER_CAPACITY};
pub use container::{
    compress, decompress, CompressionStats, DecompressionStats, Header, MAGIC, MAX_GARBAGE,
    MAX_TREE_SIZE, PREAMBLE_LEN,
};
pub use error::{HuffError, Result};
pub use frequency::{FrequencyTable, ALPHABET_SIZE};
pub use queue::{HeapQueue, PriorityQueue};
pub use serialize::{parse_tree, read_tree, tree_bytes, write_tree, ESCAPE, INTERNAL_MARKER};
pub use tree::{HuffmanTree, NodeKind, Preorder, TreeNode};

/// Arena key identifying a node within a [`HuffmanTree`].
pub use slotmap::DefaultKey;
