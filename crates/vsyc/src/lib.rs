//! # vsyc
//!
//! A tree-walking interpreter for a small `@keyword` scripting language.
//!
//! Source text is tokenized into a flat arena of nodes, each pointing back at
//! the bracket that encloses it. Statements are keyword nodes whose operands
//! are the nodes that follow them; nothing is ever parsed into a nested tree.
//!
//! ## Architecture
//!
//! - **Tokenizer**: source text to a flat [`Node`] sequence
//! - **Symbol Table**: append-only registry of variables and functions
//! - **Tree Store**: every loaded module plus the current-module cursor
//! - **Evaluator**: keyword dispatch, `[#name]` substitution, calls and imports
//! - **Host**: the [`SourceLoader`] and [`NativeCall`] capabilities
//!
//! ```text
//! @declare "a = 1"
//! @func {add} (b, c) { @return "[#a]" }
//! @call "*add" (2, 3) {out}
//! @print "[#out]"
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod eval;
pub mod host;
pub mod node;
pub mod symbols;
pub mod tokenizer;
pub mod trees;
pub mod value;

// Re-export main types
pub use context::{EvalContext, DEFAULT_MAX_CALL_DEPTH};
pub use error::{EvalError, LoadError, Result};
pub use eval::{ControlFlow, Diagnostic, Interpreter, Keyword, Site};
pub use host::{FsLoader, MemoryLoader, NativeCall, SourceLoader, SOURCE_EXTENSION};
pub use node::{Node, NodeKind, NodeQuery, Parent};
pub use symbols::{
    Address, Function, Scope, Symbol, SymbolData, SymbolKind, SymbolTable, Variable,
    ADDRESS_STRIDE,
};
pub use tokenizer::{render, tokenize};
pub use trees::{Module, ModuleId, TreeStore};
pub use value::Value;

/// vsyc version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
