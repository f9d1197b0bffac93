use crate::frequency::{FrequencyTable, ALPHABET_SIZE};
use crate::tree::{HuffmanTree, NodeKind};
use std::fmt;

/// A prefix code: the path from the root to a leaf, `false` for left and
/// `true` for right.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Byte value to code mapping generated from a finished tree.
#[derive(Debug, Clone)]
pub struct CodeBook {
    codes: Vec<Option<Code>>,
    max_len: usize,
}

impl CodeBook {
    /// Walks the tree and records the path to every leaf.
    ///
    /// A tree consisting of a lone leaf gives that byte the one-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; ALPHABET_SIZE];
        let Some(root) = tree.root() else {
            return Self { codes, max_len: 0 };
        };

        let max_len = tree.height().unwrap_or(0).max(1);

        if let NodeKind::Leaf(byte) = tree.nodes[root].kind {
            let mut code = Code::with_capacity(max_len);
            code.push(false);
            codes[byte as usize] = Some(code);
            return Self { codes, max_len };
        }

        let mut stack = vec![(root, Code::with_capacity(max_len))];
        while let Some((key, path)) = stack.pop() {
            match tree.nodes[key].kind {
                NodeKind::Leaf(byte) => codes[byte as usize] = Some(path),
                NodeKind::Internal { left, right } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((right, right_path));
                    stack.push((left, left_path));
                }
            }
        }

        Self { codes, max_len }
    }

    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes[byte as usize].as_ref()
    }

    /// Length of the longest code in the book.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of bytes with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// Iterates `(byte, code)` in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(byte, code)| code.as_ref().map(|code| (byte as u8, code)))
    }

    /// True if no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.codes.iter().flatten().collect();
        // After sorting, any prefix sits directly before some code it prefixes.
        codes.sort_by(|a, b| a.bits.cmp(&b.bits));
        codes.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }

    /// Number of payload bits needed to encode a histogram with this book.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .present()
            .map(|(byte, count)| self.get(byte).map_or(0, |code| code.len() as u64) * count)
            .sum()
    }
}
