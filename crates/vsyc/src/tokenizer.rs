//! Character-level tokenizer
//!
//! Turns source text into the flat node sequence described in [`crate::node`].
//! The tokenizer is a single pass over the characters with a handful of state
//! flags and a stack of open bracket nodes:
//!
//! - `{` / `(` open a BLOCK / PAREN node and push it on the stack;
//!   `}` / `)` pop it again.
//! - `"` toggles string mode; entering it creates a STRING node.
//! - `@` starts a KEYWORD node that runs until the next whitespace.
//! - Other characters extend the open string, keyword or innermost bracket,
//!   in that priority. At top level, space-separated runs of bare text become
//!   NUMBER, ARRAY or OTHER nodes.
//! - `\n`, `\t`, `\r` and `\v` are never part of any node.
//!
//! Every new node records the innermost open bracket as its parent.

use tracing::trace;

use crate::node::{Node, NodeKind, Parent};
use crate::value::Value;

/// Tokenize source text into a flat node sequence.
pub fn tokenize(source: &str) -> Vec<Node> {
    let mut tokenizer = Tokenizer::default();
    for ch in source.chars() {
        tokenizer.step(ch);
    }
    tokenizer.nodes
}

#[derive(Debug, Default)]
struct Tokenizer {
    nodes: Vec<Node>,
    in_string: bool,
    in_keyword: bool,
    /// Open bracket nodes, innermost last
    open: Vec<usize>,
    /// Bare top-level run currently being extended
    bare: Option<usize>,
}

impl Tokenizer {
    fn step(&mut self, ch: char) {
        if matches!(ch, '\n' | '\t' | '\r' | '\x0B') {
            self.in_keyword = false;
            self.bare = None;
            return;
        }

        if self.in_string {
            if ch == '"' {
                self.in_string = false;
            } else {
                self.append_last(ch);
            }
            return;
        }

        match ch {
            '{' => self.open_bracket(NodeKind::Block),
            '(' => self.open_bracket(NodeKind::Paren),
            '}' => self.close_bracket(NodeKind::Block),
            ')' => self.close_bracket(NodeKind::Paren),
            '"' => {
                self.in_keyword = false;
                self.in_string = true;
                self.create(NodeKind::String);
            }
            '@' => {
                self.in_keyword = true;
                self.create(NodeKind::Keyword);
            }
            ' ' if self.in_keyword => self.in_keyword = false,
            _ if self.in_keyword => self.append_last(ch),
            _ => {
                if let Some(&top) = self.open.last() {
                    self.nodes[top].value.push(ch);
                } else if ch == ' ' {
                    self.bare = None;
                } else {
                    self.append_bare(ch);
                }
            }
        }
    }

    fn parent(&self) -> Parent {
        match self.open.last() {
            Some(&idx) => Parent::Node(idx),
            None => Parent::TopLevel,
        }
    }

    fn create(&mut self, kind: NodeKind) -> usize {
        let node = Node::new(kind, self.parent());
        self.nodes.push(node);
        self.bare = None;
        self.nodes.len() - 1
    }

    /// Strings and keywords are always the most recently created node while
    /// they are open.
    fn append_last(&mut self, ch: char) {
        if let Some(node) = self.nodes.last_mut() {
            node.value.push(ch);
        }
    }

    fn append_bare(&mut self, ch: char) {
        let idx = match self.bare {
            Some(idx) => idx,
            None => {
                let idx = self.create(NodeKind::Other);
                self.bare = Some(idx);
                idx
            }
        };
        let node = &mut self.nodes[idx];
        node.value.push(ch);
        node.kind = classify_bare(&node.value);
    }

    fn open_bracket(&mut self, kind: NodeKind) {
        self.in_keyword = false;
        let idx = self.create(kind);
        self.open.push(idx);
    }

    fn close_bracket(&mut self, kind: NodeKind) {
        self.in_keyword = false;
        self.bare = None;
        match self.open.last() {
            Some(&top) if self.nodes[top].kind == kind => {
                self.open.pop();
            }
            _ => trace!(kind = %kind, "ignoring unbalanced closing bracket"),
        }
    }
}

fn classify_bare(text: &str) -> NodeKind {
    if text.starts_with('[') {
        NodeKind::Array
    } else if Value::text(text).as_number().is_some() {
        NodeKind::Number
    } else {
        NodeKind::Other
    }
}

/// Render a node sequence back to source text.
///
/// Bracket nodes print their own text followed by their children, so
/// re-tokenizing the output reproduces the same kinds and parent links.
pub fn render(nodes: &[Node]) -> String {
    let mut out = String::new();
    render_children(nodes, Parent::TopLevel, &mut out);
    out.trim_end().to_string()
}

fn render_children(nodes: &[Node], parent: Parent, out: &mut String) {
    for (idx, node) in nodes.iter().enumerate() {
        if node.parent != parent {
            continue;
        }
        match node.kind {
            NodeKind::Keyword => {
                out.push('@');
                out.push_str(&node.value);
                out.push(' ');
            }
            NodeKind::String => {
                out.push('"');
                out.push_str(&node.value);
                out.push_str("\" ");
            }
            NodeKind::Block | NodeKind::Paren => {
                let (open, close) = if node.kind == NodeKind::Block {
                    ('{', '}')
                } else {
                    ('(', ')')
                };
                out.push(open);
                out.push_str(node.value.trim());
                if nodes.iter().any(|n| n.parent == Parent::Node(idx)) {
                    out.push(' ');
                    render_children(nodes, Parent::Node(idx), out);
                }
                out.push(close);
                out.push(' ');
            }
            NodeKind::Number | NodeKind::Array | NodeKind::Other => {
                out.push_str(&node.value);
                out.push(' ');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(nodes: &[Node]) -> Vec<NodeKind> {
        nodes.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_keyword_then_string() {
        let nodes = tokenize(r#"@print "hello world""#);
        assert_eq!(kinds(&nodes), vec![NodeKind::Keyword, NodeKind::String]);
        assert_eq!(nodes[0].value, "print");
        assert_eq!(nodes[1].value, "hello world");
        assert_eq!(nodes[1].parent, Parent::TopLevel);
    }

    #[test]
    fn test_block_children_point_at_block() {
        let nodes = tokenize(r#"@func {add} (b, c) { @return "[#a]" }"#);
        assert_eq!(
            kinds(&nodes),
            vec![
                NodeKind::Keyword,
                NodeKind::Block,
                NodeKind::Paren,
                NodeKind::Block,
                NodeKind::Keyword,
                NodeKind::String,
            ]
        );
        assert_eq!(nodes[1].value, "add");
        assert_eq!(nodes[2].value, "b, c");
        assert_eq!(nodes[4].value, "return");
        assert_eq!(nodes[4].parent, Parent::Node(3));
        assert_eq!(nodes[5].parent, Parent::Node(3));
    }

    #[test]
    fn test_control_whitespace_is_dropped() {
        let nodes = tokenize("@print \"a\tb\r\nc\"");
        assert_eq!(nodes[1].value, "abc");
    }

    #[test]
    fn test_newline_ends_keyword() {
        let nodes = tokenize("@exportall\n@c \"x\"");
        assert_eq!(nodes[0].value, "exportall");
        assert_eq!(nodes[1].value, "c");
    }

    #[test]
    fn test_brackets_inside_strings_are_literal() {
        let nodes = tokenize(r#"@print "f(x) = {y} @ z""#);
        assert_eq!(kinds(&nodes), vec![NodeKind::Keyword, NodeKind::String]);
        assert_eq!(nodes[1].value, "f(x) = {y} @ z");
    }

    #[test]
    fn test_nested_blocks() {
        let nodes = tokenize(r#"{ @if {c} do: { @print "x" } @print "y" }"#);
        // 0 {  1 @if  2 {c}  3 {body}  4 @print  5 "x"  6 @print  7 "y"
        assert_eq!(nodes[1].parent, Parent::Node(0));
        assert_eq!(nodes[2].parent, Parent::Node(0));
        assert_eq!(nodes[3].parent, Parent::Node(0));
        assert_eq!(nodes[4].parent, Parent::Node(3));
        assert_eq!(nodes[5].parent, Parent::Node(3));
        assert_eq!(nodes[6].parent, Parent::Node(0));
        assert_eq!(nodes[7].parent, Parent::Node(0));
    }

    #[test]
    fn test_paren_inside_block_resumes_block() {
        let nodes = tokenize(r#"{ (a) @print "z" }"#);
        assert_eq!(nodes[1].kind, NodeKind::Paren);
        assert_eq!(nodes[1].parent, Parent::Node(0));
        assert_eq!(nodes[2].parent, Parent::Node(0));
    }

    #[test]
    fn test_bare_runs() {
        let nodes = tokenize("@if {c} do: 12 [1,2]");
        assert_eq!(
            kinds(&nodes[2..]),
            vec![NodeKind::Other, NodeKind::Number, NodeKind::Array]
        );
        assert_eq!(nodes[2].value, "do:");
        assert_eq!(nodes[3].value, "12");
    }

    #[test]
    fn test_unbalanced_close_is_ignored() {
        let nodes = tokenize(r#"} @print "x""#);
        assert_eq!(kinds(&nodes), vec![NodeKind::Keyword, NodeKind::String]);
        assert_eq!(nodes[1].parent, Parent::TopLevel);
    }

    #[test]
    fn test_mismatched_close_leaves_outer_block_open() {
        // The `}` arrives while the paren is innermost and is dropped; the
        // paren's own `)` then closes it and the block stays open.
        let nodes = tokenize(r#"{ ( } ) @c "x" }"#);
        assert_eq!(
            kinds(&nodes),
            vec![
                NodeKind::Block,
                NodeKind::Paren,
                NodeKind::Keyword,
                NodeKind::String
            ]
        );
        assert_eq!(nodes[1].parent, Parent::Node(0));
        assert_eq!(nodes[2].parent, Parent::Node(0));
        assert_eq!(nodes[3].parent, Parent::Node(0));

        let after = tokenize(r#"{ ( } ) } @c "y""#);
        assert_eq!(after[2].parent, Parent::TopLevel);
    }

    #[test]
    fn test_render_round_trip_structure() {
        let src = "@func {add} (b, c) {\n  @if {x} do: { @print \"[#add.args.b]\" }\n  @return \"[#a]\"\n}\n@call \"*add\" (2,3) {out}";
        let first = tokenize(src);
        let second = tokenize(&render(&first));
        let shape = |nodes: &[Node]| {
            nodes
                .iter()
                .map(|n| (n.kind, n.parent, n.value.trim().to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(shape(&first), shape(&second));
    }
}
