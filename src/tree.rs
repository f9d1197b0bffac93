use slotmap::{DefaultKey, SlotMap};

/// Shape of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// One original byte value.
    Leaf(u8),

    /// A merge node owning exactly two subtrees.
    Internal { left: DefaultKey, right: DefaultKey },
}

/// A node in the Huffman tree arena.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub kind: NodeKind,
    /// Occurrence count for leaves, sum of both children for internal nodes.
    /// Trees rebuilt from a container carry zero everywhere.
    pub frequency: u64,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// The byte value of a leaf.
    pub fn byte(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Leaf(byte) => Some(byte),
            NodeKind::Internal { .. } => None,
        }
    }

    /// `(left, right)` of an internal node.
    pub fn children(&self) -> Option<(DefaultKey, DefaultKey)> {
        match self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Internal { left, right } => Some((left, right)),
        }
    }
}

/// A Huffman tree stored in a generational arena.
///
/// The tree is empty (no root) only for empty input. Children are referenced
/// by key, and every key in the arena is reachable from the root.
#[derive(Debug, Clone, Default)]
pub struct HuffmanTree {
    pub(crate) nodes: SlotMap<DefaultKey, TreeNode>,
    pub(crate) root: Option<DefaultKey>,
}

impl HuffmanTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_leaf(&mut self, byte: u8, frequency: u64) -> DefaultKey {
        self.nodes.insert(TreeNode {
            kind: NodeKind::Leaf(byte),
            frequency,
        })
    }

    /// Adds a merge node over two existing subtrees.
    pub(crate) fn add_internal(&mut self, left: DefaultKey, right: DefaultKey) -> DefaultKey {
        debug_assert!(left != right, "Internal node needs two distinct children");
        let frequency = self.nodes[left].frequency + self.nodes[right].frequency;
        self.nodes.insert(TreeNode {
            kind: NodeKind::Internal { left, right },
            frequency,
        })
    }

    pub(crate) fn set_root(&mut self, root: DefaultKey) {
        debug_assert!(self.nodes.contains_key(root));
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<DefaultKey> {
        self.root
    }

    pub fn node(&self, key: DefaultKey) -> Option<&TreeNode> {
        self.nodes.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.values().filter(|node| node.is_leaf()).count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes.values().filter(|node| !node.is_leaf()).count()
    }

    /// Aggregate frequency at the root, zero for an empty tree.
    pub fn frequency(&self) -> u64 {
        self.root.map_or(0, |root| self.nodes[root].frequency)
    }

    /// Longest root-to-leaf edge count. `None` for an empty tree, `Some(0)`
    /// for a lone leaf.
    pub fn height(&self) -> Option<usize> {
        self.preorder().map(|(_, _, depth)| depth).max()
    }

    /// Leaf bytes in left-to-right order.
    pub fn leaves(&self) -> Vec<u8> {
        self.preorder().filter_map(|(_, node, _)| node.byte()).collect()
    }

    /// Pre-order walk yielding `(key, node, depth)`.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: self.root.map(|root| (root, 0)).into_iter().collect(),
        }
    }

    /// Compares shape and leaf values, ignoring frequencies.
    pub fn same_shape(&self, other: &HuffmanTree) -> bool {
        let mut ours = self.preorder();
        let mut theirs = other.preorder();
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some((_, a, depth_a)), Some((_, b, depth_b))) => {
                    if depth_a != depth_b || a.byte() != b.byte() || a.is_leaf() != b.is_leaf() {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

/// Iterator over a tree in pre-order, left subtree before right.
///
/// Uses an explicit stack so arbitrarily deep trees cannot overflow.
pub struct Preorder<'a> {
    tree: &'a HuffmanTree,
    stack: Vec<(DefaultKey, usize)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (DefaultKey, &'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, depth) = self.stack.pop()?;
        let node = &self.tree.nodes[key];
        if let NodeKind::Internal { left, right } = node.kind {
            self.stack.push((right, depth + 1));
            self.stack.push((left, depth + 1));
        }
        Some((key, node, depth))
    }
}
