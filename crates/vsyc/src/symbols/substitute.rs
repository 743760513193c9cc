//! Scoped placeholder substitution and bound-node rewriting

use std::ops::Range;

use super::{Address, Scope, SymbolTable};
use crate::trees::Module;

const OPEN: &str = "[#";
const CLOSE: char = ']';

/// Replace every resolvable `[#name]` placeholder in `module`.
///
/// A placeholder is replaced only by a variable visible from the node's
/// enclosing scope. The node is then bound to the last variable substituted
/// into it, and remembers where that variable's text landed, so later value
/// changes can find it by address and position.
pub fn substitute(module: &mut Module, symbols: &SymbolTable) {
    let id = module.id();
    for node in module.nodes_mut() {
        if !node.value.contains(OPEN) {
            continue;
        }
        let site = Scope::enclosing(id, node.parent);
        if let Some(expansion) = expand(&node.value, &site, symbols) {
            node.value = expansion.text;
            node.bound = Some(expansion.address);
            node.span = Some(expansion.span);
        }
    }
}

struct Expansion {
    text: String,
    address: Address,
    span: Range<usize>,
}

/// Expand placeholders in `text`. `None` when nothing resolved.
fn expand(text: &str, site: &Scope, symbols: &SymbolTable) -> Option<Expansion> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut last = None;

    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(CLOSE) else {
            break;
        };
        let name = after[..end].trim();
        match symbols.resolve(name, site) {
            Some((address, var)) => {
                out.push_str(&rest[..start]);
                let from = out.len();
                out.push_str(var.text.trim());
                last = Some((address.clone(), from..out.len()));
            }
            None => out.push_str(&rest[..start + OPEN.len() + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    last.map(|(address, span)| Expansion {
        text: out,
        address,
        span,
    })
}

/// Propagate a value change into every node bound to `address`.
///
/// The previous text is replaced as a literal substring of each bound node's
/// current text. An empty previous value has no substring to find, so it is
/// replaced at the node's recorded span instead.
pub fn rewrite_bound(module: &mut Module, address: &Address, old: &str, new: &str) {
    for node in module.nodes_mut() {
        if node.bound.as_ref() != Some(address) {
            continue;
        }
        // Only trust the span while it still covers the old text.
        let span = node
            .span
            .take()
            .filter(|span| node.value.get(span.clone()) == Some(old));
        match span {
            Some(span) if old.is_empty() => {
                node.value.replace_range(span.clone(), new);
                node.span = Some(span.start..span.start + new.len());
            }
            Some(span) => {
                let before = node.value[..span.start].matches(old).count();
                node.value = node.value.replace(old, new);
                let start = span.start - before * old.len() + before * new.len();
                node.span = Some(start..start + new.len());
            }
            None if old.is_empty() => {
                node.value = new.to_string();
                node.span = Some(0..new.len());
            }
            None => node.value = node.value.replace(old, new),
        }
    }
}

/// Overwrite every node bound to `address` with `new`.
pub fn overwrite_bound(module: &mut Module, address: &Address, new: &str) {
    for node in module.nodes_mut() {
        if node.bound.as_ref() == Some(address) {
            node.value = new.to_string();
            node.span = Some(0..new.len());
        }
    }
}
