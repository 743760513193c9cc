//! Symbol table: the append-only registry of variable and function bindings
//!
//! Every `@declare` and `@func` ends up here, and records live for the rest of
//! the interpreter's life. Variables are addressed by a synthetic number
//! (`count × ADDRESS_STRIDE`); functions are keyed by their own name so calls
//! can resolve them without knowing an address.

mod substitute;

pub use substitute::{overwrite_bound, rewrite_bound, substitute};

use indexmap::IndexMap;
use std::fmt;
use tracing::debug;

use crate::node::Parent;
use crate::trees::ModuleId;

/// Spacing between consecutive numeric addresses.
pub const ADDRESS_STRIDE: u64 = 812;

/// Identifier of a symbol record. Never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    /// Synthetic address assigned at registration
    Numeric(u64),
    /// Name-derived key (functions)
    Named(String),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Numeric(n) => write!(f, "{}", n),
            Address::Named(name) => write!(f, "*{}", name),
        }
    }
}

/// Where a variable is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Declared at top level: visible in every node of every module
    Global,
    /// Declared inside a bracket: visible only to that bracket's direct children
    Block {
        /// Module the bracket belongs to
        module: ModuleId,
        /// Index of the bracket node
        index: usize,
    },
}

impl Scope {
    /// Scope of a statement or node with the given parent in `module`.
    pub fn enclosing(module: ModuleId, parent: Parent) -> Self {
        match parent {
            Parent::TopLevel => Scope::Global,
            Parent::Node(index) => Scope::Block { module, index },
        }
    }

    /// Whether a variable declared in `self` may be substituted into a node
    /// whose enclosing scope is `site`.
    pub fn is_visible_from(&self, site: &Scope) -> bool {
        *self == Scope::Global || self == site
    }
}

/// Kind tag of a symbol record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// `@declare`d or bound value
    Variable,
    /// `@func` definition
    Function,
}

/// Payload of a variable record.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Current text value
    pub text: String,
    /// Scope captured at declaration
    pub scope: Scope,
}

/// Payload of a function record.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Parameter list as written
    pub raw_params: String,
    /// Index of the body block in the owning module
    pub body: usize,
    /// Module whose nodes hold the body
    pub owner: ModuleId,
    /// Parsed parameter names
    pub params: Vec<String>,
}

/// A symbol payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolData {
    /// Variable binding
    Variable(Variable),
    /// Function definition
    Function(Function),
}

/// A registered symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// The record's address
    pub address: Address,
    /// The payload
    pub data: SymbolData,
}

impl Symbol {
    /// Kind tag of this record.
    pub fn kind(&self) -> SymbolKind {
        match self.data {
            SymbolData::Variable(_) => SymbolKind::Variable,
            SymbolData::Function(_) => SymbolKind::Function,
        }
    }

    /// Variable payload, if this is a variable.
    pub fn as_variable(&self) -> Option<&Variable> {
        match &self.data {
            SymbolData::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// Function payload, if this is a function.
    pub fn as_function(&self) -> Option<&Function> {
        match &self.data {
            SymbolData::Function(f) => Some(f),
            _ => None,
        }
    }
}

/// Registry of every symbol, in registration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    records: IndexMap<Address, Symbol>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its address.
    ///
    /// Without `override_key` the address is `count × ADDRESS_STRIDE`. With it,
    /// the key itself is the address; registering the same key again replaces
    /// that record's payload.
    pub fn register(&mut self, data: SymbolData, override_key: Option<&str>) -> Address {
        let address = match override_key {
            Some(key) => Address::Named(key.to_string()),
            None => Address::Numeric(self.records.len() as u64 * ADDRESS_STRIDE),
        };
        debug!(%address, "registering symbol");
        self.records.insert(
            address.clone(),
            Symbol {
                address: address.clone(),
                data,
            },
        );
        address
    }

    /// Look up a record by address.
    pub fn lookup(&self, address: &Address) -> Option<&Symbol> {
        self.records.get(address)
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.records
            .get(&Address::Named(name.to_string()))
            .and_then(Symbol::as_function)
    }

    /// The variable named `name` declared in exactly `scope`.
    pub fn variable_in(&self, name: &str, scope: &Scope) -> Option<(&Address, &Variable)> {
        self.variables()
            .rev()
            .find(|(_, v)| v.name == name && v.scope == *scope)
    }

    /// The variable named `name` visible from `site`: one declared in the same
    /// scope wins over a global one.
    pub fn resolve(&self, name: &str, site: &Scope) -> Option<(&Address, &Variable)> {
        self.variable_in(name, site)
            .or_else(|| self.variable_in(name, &Scope::Global))
    }

    /// Replace a variable's text, returning the previous text.
    pub fn set_text(&mut self, address: &Address, text: impl Into<String>) -> Option<String> {
        match self.records.get_mut(address).map(|s| &mut s.data) {
            Some(SymbolData::Variable(var)) => Some(std::mem::replace(&mut var.text, text.into())),
            _ => None,
        }
    }

    /// All variable records in registration order.
    pub fn variables(&self) -> impl DoubleEndedIterator<Item = (&Address, &Variable)> {
        self.records
            .iter()
            .filter_map(|(addr, s)| s.as_variable().map(|v| (addr, v)))
    }

    /// Every address registered so far.
    pub fn addresses(&self) -> Vec<Address> {
        self.records.keys().cloned().collect()
    }

    /// Iterate over all records.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.records.values()
    }

    /// Get the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, text: &str, scope: Scope) -> SymbolData {
        SymbolData::Variable(Variable {
            name: name.into(),
            text: text.into(),
            scope,
        })
    }

    #[test]
    fn test_numeric_addresses_use_stride() {
        let mut table = SymbolTable::new();
        let a = table.register(var("a", "1", Scope::Global), None);
        let b = table.register(var("b", "2", Scope::Global), None);
        assert_eq!(a, Address::Numeric(0));
        assert_eq!(b, Address::Numeric(ADDRESS_STRIDE));
    }

    #[test]
    fn test_named_keys_do_not_collide_with_numeric() {
        let mut table = SymbolTable::new();
        table.register(var("a", "1", Scope::Global), None);
        let f = table.register(
            SymbolData::Function(Function {
                name: "f".into(),
                raw_params: String::new(),
                body: 3,
                owner: ModuleId(0),
                params: vec![],
            }),
            Some("f"),
        );
        let c = table.register(var("c", "3", Scope::Global), None);
        assert_eq!(f, Address::Named("f".into()));
        assert_eq!(c, Address::Numeric(2 * ADDRESS_STRIDE));
        assert_eq!(table.lookup(&f).map(Symbol::kind), Some(SymbolKind::Function));
        assert!(table.function("f").is_some());
        assert!(table.function("a").is_none());
    }

    #[test]
    fn test_resolve_prefers_same_scope() {
        let mut table = SymbolTable::new();
        let block = Scope::Block {
            module: ModuleId(0),
            index: 4,
        };
        table.register(var("x", "global", Scope::Global), None);
        table.register(var("x", "local", block), None);

        assert_eq!(table.resolve("x", &block).unwrap().1.text, "local");
        assert_eq!(table.resolve("x", &Scope::Global).unwrap().1.text, "global");
        let other = Scope::Block {
            module: ModuleId(1),
            index: 4,
        };
        assert_eq!(table.resolve("x", &other).unwrap().1.text, "global");
    }

    #[test]
    fn test_set_text_returns_previous() {
        let mut table = SymbolTable::new();
        let a = table.register(var("a", "1", Scope::Global), None);
        assert_eq!(table.set_text(&a, "2"), Some("1".to_string()));
        assert_eq!(table.variable_in("a", &Scope::Global).unwrap().1.text, "2");
    }

    #[test]
    fn test_block_scope_visibility() {
        let block = Scope::Block {
            module: ModuleId(0),
            index: 2,
        };
        assert!(Scope::Global.is_visible_from(&block));
        assert!(block.is_visible_from(&block));
        assert!(!block.is_visible_from(&Scope::Global));
    }
}
