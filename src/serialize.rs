//! Pre-order escaped tree encoding.
//!
//! Internal nodes are written as `*`. Leaves are written as their literal
//! byte, preceded by `\` when that byte is itself `*` or `\`. No other
//! framing is stored: the number of bytes written is the tree size
//! recorded in the container header.

use crate::error::{HuffError, Result};
use crate::tree::{HuffmanTree, NodeKind};
use std::io::{self, ErrorKind, Read, Write};

/// Serialized form of an internal node.
pub const INTERNAL_MARKER: u8 = b'*';

/// Prefix marking the following byte as a literal leaf.
pub const ESCAPE: u8 = b'\\';

/// One decoded element of the pre-order stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Leaf(u8),
    Internal,
}

/// Serializes the tree into a new buffer.
pub fn tree_bytes(tree: &HuffmanTree) -> Vec<u8> {
    let mut out = Vec::with_capacity(tree.len() + 2);
    for (_, node, _) in tree.preorder() {
        match node.kind {
            NodeKind::Leaf(byte) => {
                if byte == INTERNAL_MARKER || byte == ESCAPE {
                    out.push(ESCAPE);
                }
                out.push(byte);
            }
            NodeKind::Internal { .. } => out.push(INTERNAL_MARKER),
        }
    }
    out
}

/// Writes the serialized tree and returns the byte count, escapes included.
pub fn write_tree<W: Write>(tree: &HuffmanTree, writer: &mut W) -> io::Result<usize> {
    let bytes = tree_bytes(tree);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Reads one tree from `reader`, consuming at most `*budget` bytes.
///
/// The budget is decremented for every byte read, escape bytes included.
/// A zero budget on entry yields the empty tree. Running out of budget, or
/// out of input, while a subtree is still outstanding is a corrupt tree.
/// Bytes left in the budget after the tree completes are not read; callers
/// that require an exact fit check `*budget == 0` afterwards.
pub fn read_tree<R: Read>(reader: &mut R, budget: &mut usize) -> Result<HuffmanTree> {
    if *budget == 0 {
        return Ok(HuffmanTree::new());
    }

    let mut tokens = Vec::new();
    let mut outstanding = 1usize;
    while outstanding > 0 {
        if *budget == 0 {
            return Err(HuffError::corrupt_tree(format!(
                "tree size exhausted with {outstanding} subtree(s) outstanding"
            )));
        }
        let byte = next_byte(reader)?;
        *budget -= 1;

        let token = match byte {
            ESCAPE => {
                if *budget == 0 {
                    return Err(HuffError::corrupt_tree("escape byte at end of tree"));
                }
                let literal = next_byte(reader)?;
                *budget -= 1;
                Token::Leaf(literal)
            }
            INTERNAL_MARKER => Token::Internal,
            literal => Token::Leaf(literal),
        };

        outstanding -= 1;
        if token == Token::Internal {
            outstanding += 2;
        }
        tokens.push(token);
    }

    Ok(assemble(&tokens))
}

/// Parses a complete serialized tree, rejecting trailing bytes.
pub fn parse_tree(bytes: &[u8]) -> Result<HuffmanTree> {
    let mut budget = bytes.len();
    let mut reader = bytes;
    let tree = read_tree(&mut reader, &mut budget)?;
    if budget != 0 {
        return Err(HuffError::corrupt_tree(format!(
            "{budget} trailing byte(s) after tree"
        )));
    }
    Ok(tree)
}

fn next_byte<R: Read>(reader: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    match reader.read_exact(&mut byte) {
        Ok(()) => Ok(byte[0]),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            Err(HuffError::corrupt_tree("input ends inside tree"))
        }
        Err(e) => Err(HuffError::SourceUnreadable(e)),
    }
}

/// Builds the arena from a complete pre-order token sequence.
///
/// Walking the tokens backwards, every internal node finds its left subtree
/// on top of the stack and its right subtree just below.
fn assemble(tokens: &[Token]) -> HuffmanTree {
    let mut tree = HuffmanTree::new();
    let mut stack = Vec::new();

    for token in tokens.iter().rev() {
        match *token {
            Token::Leaf(byte) => stack.push(tree.add_leaf(byte, 0)),
            Token::Internal => {
                let (Some(left), Some(right)) = (stack.pop(), stack.pop()) else {
                    break;
                };
                stack.push(tree.add_internal(left, right));
            }
        }
    }

    debug_assert_eq!(stack.len(), 1, "token stream must describe one tree");
    if let Some(root) = stack.pop() {
        tree.set_root(root);
    }
    tree
}
