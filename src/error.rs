//! Error types for huffpack

use std::io;
use thiserror::Error;

/// Result type alias using [`HuffError`]
pub type Result<T> = std::result::Result<T, HuffError>;

/// Everything that can go wrong while packing or unpacking a container.
#[derive(Error, Debug)]
pub enum HuffError {
    /// The input could not be opened, read or rewound, or it changed
    /// between the counting and packing passes.
    #[error("source unreadable: {0}")]
    SourceUnreadable(#[source] io::Error),

    /// The output could not be created, written or sought.
    #[error("sink unwritable: {0}")]
    SinkUnwritable(#[source] io::Error),

    /// The serialized tree does not describe exactly one complete tree.
    #[error("corrupt tree: {0}")]
    CorruptTree(String),

    /// The input holds a single distinct byte and the options reject it.
    #[error("degenerate alphabet: input consists only of byte {0:#04x}")]
    DegenerateAlphabet(u8),

    /// The container does not start with the `AB` fingerprint.
    #[error("bad magic: expected [41, 42], found {0:02x?}")]
    BadMagic([u8; 2]),

    /// The container ends before the magic and header are complete.
    #[error("container truncated before end of header")]
    Truncated,

    /// The payload bit accounting is inconsistent with the tree.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    /// A header field does not fit its bit width.
    #[error("header overflow: garbage {garbage} (max 7), tree size {tree_size} (max 8191)")]
    HeaderOverflow { garbage: u8, tree_size: usize },
}

impl HuffError {
    pub(crate) fn corrupt_tree(msg: impl Into<String>) -> Self {
        HuffError::CorruptTree(msg.into())
    }

    pub(crate) fn corrupt_payload(msg: impl Into<String>) -> Self {
        HuffError::CorruptPayload(msg.into())
    }
}
