/// Default capacity of the buffered reader and writer wrapped around each stream.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// What to do when the input holds exactly one distinct byte value.
///
/// The plain greedy construction yields a root leaf whose code is the empty
/// bit string, which cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingleSymbolPolicy {
    /// Give the lone leaf the code `0` and store one bit per occurrence.
    #[default]
    OneBitCode,

    /// Refuse to compress with
    /// [`HuffError::DegenerateAlphabet`](crate::HuffError::DegenerateAlphabet).
    Reject,
}

/// Options shared by compression and decompression.
///
/// # Example
///
/// ```
/// use huffpack::{CodecOptions, SingleSymbolPolicy};
///
/// let options = CodecOptions::new()
///     .verify_magic(true)
///     .single_symbol(SingleSymbolPolicy::Reject);
/// assert!(options.verify_magic);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Reject containers whose first two bytes are not `AB`.
    pub verify_magic: bool,

    /// Handling of single-symbol inputs.
    pub single_symbol: SingleSymbolPolicy,

    /// Capacity of the `BufReader`/`BufWriter` around each stream.
    pub buffer_capacity: usize,
}

impl CodecOptions {
    pub fn new() -> Self {
        Self {
            verify_magic: false,
            single_symbol: SingleSymbolPolicy::default(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Magic verification on, single-symbol inputs rejected.
    pub fn strict() -> Self {
        Self::new()
            .verify_magic(true)
            .single_symbol(SingleSymbolPolicy::Reject)
    }

    pub fn verify_magic(mut self, verify: bool) -> Self {
        self.verify_magic = verify;
        self
    }

    pub fn single_symbol(mut self, policy: SingleSymbolPolicy) -> Self {
        self.single_symbol = policy;
        self
    }

    /// Sets the stream buffer capacity. Zero is raised to one byte.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self::new()
    }
}
