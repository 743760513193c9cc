//! Flat node arena produced by the tokenizer
//!
//! A module's source is never turned into a nested tree. Every node instead
//! remembers the index of the bracket node that encloses it ([`Parent`]), and
//! scope membership, function bodies and statement operands are all recovered
//! from those back-references with forward scans over the flat sequence.

use std::fmt;
use std::ops::Range;

use crate::symbols::Address;

/// Kind of a tokenized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `@name`
    Keyword,
    /// `"..."`
    String,
    /// `{...}`
    Block,
    /// `(...)`
    Paren,
    /// Bare top-level text that reads as a number
    Number,
    /// Bare top-level text starting with `[`
    Array,
    /// Any other bare top-level text
    Other,
}

impl NodeKind {
    /// Lowercase name used in diagnostics and token dumps.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Keyword => "keyword",
            NodeKind::String => "string",
            NodeKind::Block => "block",
            NodeKind::Paren => "paren",
            NodeKind::Number => "number",
            NodeKind::Array => "array",
            NodeKind::Other => "other",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Back-reference to the bracket node enclosing a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// Not nested in any bracket
    TopLevel,
    /// Index of the enclosing block or paren node
    Node(usize),
}

impl Parent {
    /// Index of the enclosing node, if any.
    pub fn index(self) -> Option<usize> {
        match self {
            Parent::TopLevel => None,
            Parent::Node(idx) => Some(idx),
        }
    }
}

/// A tokenized unit of source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What the node is
    pub kind: NodeKind,

    /// Current text; rewritten in place by substitution
    pub value: String,

    /// Enclosing bracket node
    pub parent: Parent,

    /// Variable whose value was last substituted into this node
    pub bound: Option<Address>,

    /// Byte range of the bound variable's text within `value`
    pub span: Option<Range<usize>>,
}

impl Node {
    /// Create an empty node.
    pub fn new(kind: NodeKind, parent: Parent) -> Self {
        Self {
            kind,
            value: String::new(),
            parent,
            bound: None,
            span: None,
        }
    }

    /// Whether this is the keyword `@name`.
    pub fn is_keyword(&self, name: &str) -> bool {
        self.kind == NodeKind::Keyword && self.value == name
    }
}

/// Forward-scan queries over a node sequence.
///
/// Implemented for slices so the same queries work on a module's nodes and on
/// freshly tokenized output.
pub trait NodeQuery {
    /// First node of `kind` at or after `from`, ignoring nesting.
    fn next_of_kind(&self, kind: NodeKind, from: usize) -> Option<usize>;

    /// The `nth` operand of `kind` belonging to the statement at `keyword`.
    ///
    /// Operands are the keyword's siblings (same parent) that follow it, up to
    /// the next sibling keyword. Content nested inside a sibling bracket is
    /// skipped.
    fn operand(&self, keyword: usize, kind: NodeKind, nth: usize) -> Option<usize>;

    /// Indices of the direct children of the bracket node at `parent`.
    fn children(&self, parent: usize) -> Vec<usize>;

    /// Whether any enclosing bracket of the node at `idx` is a block.
    fn is_within_block(&self, idx: usize) -> bool;
}

impl NodeQuery for [Node] {
    fn next_of_kind(&self, kind: NodeKind, from: usize) -> Option<usize> {
        (from..self.len()).find(|&i| self[i].kind == kind)
    }

    fn operand(&self, keyword: usize, kind: NodeKind, nth: usize) -> Option<usize> {
        let parent = self.get(keyword)?.parent;
        let mut seen = 0;
        for (i, node) in self.iter().enumerate().skip(keyword + 1) {
            if node.parent != parent {
                continue;
            }
            if node.kind == NodeKind::Keyword {
                return None;
            }
            if node.kind == kind {
                if seen == nth {
                    return Some(i);
                }
                seen += 1;
            }
        }
        None
    }

    fn children(&self, parent: usize) -> Vec<usize> {
        self.iter()
            .enumerate()
            .filter(|(_, n)| n.parent == Parent::Node(parent))
            .map(|(i, _)| i)
            .collect()
    }

    fn is_within_block(&self, idx: usize) -> bool {
        let mut current = self.get(idx).map(|n| n.parent);
        // Parents always precede their children, so this walk terminates.
        while let Some(Parent::Node(p)) = current {
            match self.get(p) {
                Some(node) if node.kind == NodeKind::Block => return true,
                Some(node) if p < idx => current = Some(node.parent),
                _ => return false,
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_next_of_kind() {
        let nodes = tokenize(r#"@print "a" @print "b""#);
        assert_eq!(nodes.next_of_kind(NodeKind::String, 0), Some(1));
        assert_eq!(nodes.next_of_kind(NodeKind::String, 2), Some(3));
        assert_eq!(nodes.next_of_kind(NodeKind::Block, 0), None);
    }

    #[test]
    fn test_operand_stops_at_next_keyword() {
        let nodes = tokenize(r#"@call "*f" () @insert "x" {arr}"#);
        assert_eq!(nodes.operand(0, NodeKind::String, 0), Some(1));
        assert_eq!(nodes.operand(0, NodeKind::Paren, 0), Some(2));
        // {arr} belongs to the @insert statement
        assert_eq!(nodes.operand(0, NodeKind::Block, 0), None);
        assert_eq!(nodes.operand(3, NodeKind::Block, 0), Some(5));
    }

    #[test]
    fn test_operand_skips_nested_content() {
        let nodes = tokenize(r#"@func {f} (a) { @print "x" } {extra}"#);
        assert_eq!(nodes.operand(0, NodeKind::Block, 0), Some(1));
        assert_eq!(nodes.operand(0, NodeKind::Block, 1), Some(3));
        assert_eq!(nodes.operand(0, NodeKind::Block, 2), Some(6));
        assert_eq!(nodes.operand(0, NodeKind::String, 0), None);
    }

    #[test]
    fn test_children_and_within_block() {
        let nodes = tokenize(r#"@func {f} () { @return "x" }"#);
        assert_eq!(nodes.children(3), vec![4, 5]);
        assert!(nodes.is_within_block(4));
        assert!(!nodes.is_within_block(0));
        // The body block itself sits at top level
        assert!(!nodes.is_within_block(3));
    }
}
