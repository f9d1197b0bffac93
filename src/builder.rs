//! Greedy Huffman tree construction.
//!
//! Leaves enter the queue in ascending byte order. The two lowest-frequency
//! entries are merged (first extracted on the left) and the merge node goes
//! back into the queue until a single root remains.

use crate::frequency::FrequencyTable;
use crate::queue::{HeapQueue, PriorityQueue};
use crate::tree::HuffmanTree;
use slotmap::DefaultKey;

/// Builds the tree for a histogram using the default heap queue.
pub fn build_tree(frequencies: &FrequencyTable) -> HuffmanTree {
    build_tree_with(frequencies, HeapQueue::with_capacity(frequencies.distinct()))
}

/// Builds the tree for a histogram using the supplied queue backing.
///
/// An empty histogram gives an empty tree; a single present byte gives a
/// lone leaf as root with no merge.
pub fn build_tree_with<Q>(frequencies: &FrequencyTable, mut queue: Q) -> HuffmanTree
where
    Q: PriorityQueue<DefaultKey>,
{
    let mut tree = HuffmanTree::new();

    for (byte, count) in frequencies.present() {
        let leaf = tree.add_leaf(byte, count);
        queue.insert(count, leaf);
    }
    let leaves = queue.len();

    let mut merges = 0usize;
    while queue.len() > 1 {
        let (Some(left), Some(right)) = (queue.extract_min(), queue.extract_min()) else {
            break;
        };
        let merged = tree.add_internal(left, right);
        queue.insert(tree.nodes[merged].frequency, merged);
        merges += 1;
    }

    if let Some(root) = queue.extract_min() {
        tree.set_root(root);
    }

    debug_assert_eq!(tree.frequency(), frequencies.total());
    tracing::trace!(leaves, merges, "huffman tree built");
    tree
}

impl HuffmanTree {
    /// Builds the tree for a histogram.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        build_tree(frequencies)
    }

    /// Counts `data` and builds its tree.
    pub fn from_bytes(data: &[u8]) -> Self {
        build_tree(&FrequencyTable::from_bytes(data))
    }
}
