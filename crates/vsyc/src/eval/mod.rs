//! Statement evaluation over flat node sequences
//!
//! The [`Interpreter`] owns every piece of state a run touches: the symbol
//! table, the tree store, the host capabilities and the collected output.
//! Each keyword's behavior lives in its own submodule as an
//! `impl Interpreter` block; this module holds the walker that decides which
//! keyword nodes run and the helpers those submodules share.

pub mod array;
pub mod binary;
pub mod call;
pub mod control;
pub mod function;
pub mod if_expr;
pub mod keywords;
pub mod link;
pub mod native;
pub mod stmt;

pub use control::ControlFlow;
pub use keywords::{is_allow_listed, Keyword, ALLOW_LIST};

use tracing::{trace, warn};

use crate::context::EvalContext;
use crate::error::{EvalError, Result};
use crate::host::{NativeCall, SourceLoader};
use crate::node::{Node, NodeKind, NodeQuery};
use crate::symbols::{
    overwrite_bound, rewrite_bound, substitute, Address, Scope, SymbolData, SymbolTable, Variable,
};
use crate::tokenizer::tokenize;
use crate::trees::{ModuleId, TreeStore};
use crate::value::Value;

/// Location of a node: module plus index into its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    /// Module holding the node
    pub module: ModuleId,
    /// Index of the node
    pub index: usize,
}

impl Site {
    /// Create a site.
    pub fn new(module: ModuleId, index: usize) -> Self {
        Self { module, index }
    }
}

/// A statement failure the evaluator recovered from.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Name of the module the statement belongs to
    pub module: String,
    /// Index of the statement's keyword node
    pub index: usize,
    /// What went wrong
    pub error: EvalError,
}

/// Split a comma-separated operand list, trimming items and dropping blanks.
///
/// Used for parameter lists, call arguments and `@read` specs.
pub(crate) fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// How a value change reaches the nodes bound to a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Propagation {
    /// Replace the old text inside each bound node
    Rewrite,
    /// Replace each bound node's whole text
    Overwrite,
}

/// The interpreter: symbol table, loaded modules and host capabilities.
///
/// # Example
///
/// ```
/// use vsyc::{Interpreter, MemoryLoader};
///
/// let mut interp = Interpreter::new(MemoryLoader::new());
/// interp
///     .run_source("main", "@declare \"name = world\"\n@print \"hello [#name]\"")
///     .unwrap();
/// assert_eq!(interp.output(), ["hello world"]);
/// ```
pub struct Interpreter {
    symbols: SymbolTable,
    trees: TreeStore,
    ctx: EvalContext,
    loader: Box<dyn SourceLoader>,
    native: Option<Box<dyn NativeCall>>,
    output: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    call_depth: usize,
}

impl Interpreter {
    /// Create an interpreter that imports through `loader`.
    pub fn new(loader: impl SourceLoader + 'static) -> Self {
        Self {
            symbols: SymbolTable::new(),
            trees: TreeStore::new(),
            ctx: EvalContext::default(),
            loader: Box::new(loader),
            native: None,
            output: Vec::new(),
            diagnostics: Vec::new(),
            call_depth: 0,
        }
    }

    /// Replace the evaluation context, builder style.
    pub fn with_context(mut self, ctx: EvalContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Install the native call capability, builder style.
    pub fn with_native(mut self, native: impl NativeCall + 'static) -> Self {
        self.native = Some(Box::new(native));
        self
    }

    // ═══════════════════════════════════════════════════════════════════
    // Entry Points
    // ═══════════════════════════════════════════════════════════════════

    /// Tokenize `source`, store it as module `name` and evaluate it.
    ///
    /// # Errors
    ///
    /// Only fatal errors are returned; failed statements are reported through
    /// [`Interpreter::diagnostics`] and evaluation continues past them.
    pub fn run_source(&mut self, name: &str, source: &str) -> Result<ModuleId> {
        let nodes = tokenize(source);
        let count = nodes.len();
        let id = self
            .trees
            .insert(name, nodes)
            .ok_or_else(|| EvalError::DuplicateModule {
                name: name.to_string(),
            })?;
        tracing::debug!(module = name, nodes = count, "loaded module");

        // Globals declared by earlier modules apply to this one as well.
        self.substitute_all();
        self.run_module(id)?;
        Ok(id)
    }

    /// Load `name` through the source loader and evaluate it.
    pub fn run_file(&mut self, name: &str) -> Result<ModuleId> {
        let source = self.loader.load(name)?;
        self.run_source(name, &source)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Lines printed so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Statement failures recovered from so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The symbol table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The tree store.
    pub fn trees(&self) -> &TreeStore {
        &self.trees
    }

    /// Text of the global variable `name`.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.symbols
            .variable_in(name, &Scope::Global)
            .map(|(_, v)| v.text.as_str())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Walking
    // ═══════════════════════════════════════════════════════════════════

    /// Run every keyword of a module that is not inside a block.
    ///
    /// Block contents are function bodies and `if` bodies; they only run when
    /// their owner invokes them.
    fn run_module(&mut self, id: ModuleId) -> Result<()> {
        let saved = self.trees.set_current(Some(id));
        let result = self.walk_module(id);
        self.trees.set_current(saved);
        result
    }

    fn walk_module(&mut self, id: ModuleId) -> Result<()> {
        for index in 0..self.nodes(id).len() {
            let nodes = self.nodes(id);
            if nodes[index].kind != NodeKind::Keyword || nodes.is_within_block(index) {
                continue;
            }
            let site = Site::new(id, index);
            match self.run_statement(site) {
                Ok(()) => {}
                Err(EvalError::ControlFlow(_)) => {
                    self.report(site, EvalError::ReturnOutsideFunction);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Run the keyword children of the block at `block`, in order.
    pub(crate) fn eval_block(&mut self, module: ModuleId, block: usize) -> Result<()> {
        let children = self.nodes(module).children(block);
        for index in children {
            if self.nodes(module)[index].kind == NodeKind::Keyword {
                self.run_statement(Site::new(module, index))?;
            }
        }
        Ok(())
    }

    /// Evaluate one statement, absorbing recoverable failures.
    fn run_statement(&mut self, site: Site) -> Result<()> {
        if self.ctx.is_interrupted() {
            return Err(EvalError::Interrupted);
        }
        match self.eval_statement(site) {
            Ok(_) => Ok(()),
            Err(e) if e.is_recoverable() => {
                self.report(site, e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Dispatch on the keyword at `site`.
    pub(crate) fn eval_statement(&mut self, site: Site) -> Result<Option<Value>> {
        let word = self.text_at(site, site.index);
        trace!(module = %site.module, index = site.index, keyword = %word, "statement");

        let Some(keyword) = Keyword::parse(&word) else {
            if is_allow_listed(&word) {
                trace!(keyword = %word, "allow-listed keyword has no behavior");
                return Ok(None);
            }
            return Err(EvalError::UnknownKeyword { keyword: word });
        };

        match keyword {
            Keyword::Comment => Ok(None),
            Keyword::Print => self.eval_print(site),
            Keyword::Declare => self.eval_declare(site),
            Keyword::Func => self.eval_func(site),
            Keyword::Return => self.eval_return(site),
            Keyword::Call => self.eval_call(site),
            Keyword::If => self.eval_if(site),
            Keyword::Eq | Keyword::Lt | Keyword::Gt | Keyword::Op => {
                Ok(Some(Value::Bool(self.eval_comparison(site)?)))
            }
            Keyword::Insert | Keyword::Remove => self.eval_array_edit(site, keyword),
            Keyword::Read => self.eval_read(site),
            Keyword::UsingFile => self.eval_usingfile(site),
            Keyword::ExportAll => self.eval_exportall(site),
            Keyword::ExecJs => self.eval_execjs(site),
        }
    }

    fn report(&mut self, site: Site, error: EvalError) {
        let module = self
            .trees
            .get(site.module)
            .map(|m| m.name().to_string())
            .unwrap_or_default();
        warn!(module = %module, index = site.index, "{}", error);
        self.diagnostics.push(Diagnostic {
            module,
            index: site.index,
            error,
        });
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Depth Tracking
    // ═══════════════════════════════════════════════════════════════════

    pub(crate) fn enter_call(&mut self) -> Result<()> {
        if self.call_depth >= self.ctx.max_call_depth {
            return Err(EvalError::StackOverflow {
                depth: self.call_depth,
                max: self.ctx.max_call_depth,
            });
        }
        self.call_depth += 1;
        Ok(())
    }

    pub(crate) fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Node Access
    // ═══════════════════════════════════════════════════════════════════

    pub(crate) fn nodes(&self, module: ModuleId) -> &[Node] {
        self.trees.get(module).map(|m| m.nodes()).unwrap_or(&[])
    }

    /// Text of node `index` in the module of `site`.
    pub(crate) fn text_at(&self, site: Site, index: usize) -> String {
        self.nodes(site.module)
            .get(index)
            .map(|n| n.value.clone())
            .unwrap_or_default()
    }

    pub(crate) fn operand(&self, site: Site, kind: NodeKind, nth: usize) -> Option<usize> {
        self.nodes(site.module).operand(site.index, kind, nth)
    }

    /// Text of a required operand, or a malformed-statement error.
    pub(crate) fn require(
        &self,
        site: Site,
        keyword: Keyword,
        kind: NodeKind,
        nth: usize,
    ) -> Result<String> {
        self.operand(site, kind, nth)
            .map(|idx| self.text_at(site, idx))
            .ok_or_else(|| {
                EvalError::malformed(
                    keyword.name(),
                    format!("missing {} operand #{}", kind, nth + 1),
                )
            })
    }

    /// Scope a statement at `site` declares into.
    pub(crate) fn scope_of(&self, site: Site) -> Scope {
        let parent = self
            .nodes(site.module)
            .get(site.index)
            .map(|n| n.parent)
            .unwrap_or(crate::node::Parent::TopLevel);
        Scope::enclosing(site.module, parent)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Variable Binding
    // ═══════════════════════════════════════════════════════════════════

    /// Re-run placeholder substitution over every loaded module.
    pub(crate) fn substitute_all(&mut self) {
        for module in self.trees.iter_mut() {
            substitute(module, &self.symbols);
        }
    }

    /// Declare `name` in `scope`, or reassign it if that scope already has it.
    pub(crate) fn bind_variable(&mut self, name: &str, text: String, scope: Scope) -> Address {
        let existing = self
            .symbols
            .variable_in(name, &scope)
            .map(|(address, _)| address.clone());
        let address = match existing {
            Some(address) => {
                self.update_variable(&address, text, Propagation::Rewrite);
                address
            }
            None => self.symbols.register(
                SymbolData::Variable(Variable {
                    name: name.to_string(),
                    text,
                    scope,
                }),
                None,
            ),
        };
        self.substitute_all();
        address
    }

    /// Write a statement's result into the output variable `name`.
    ///
    /// The variable visible from `site` is updated; if there is none, it is
    /// created in the statement's scope.
    pub(crate) fn assign_output(
        &mut self,
        site: Site,
        name: &str,
        text: String,
        propagation: Propagation,
    ) -> Address {
        let scope = self.scope_of(site);
        let existing = self
            .symbols
            .resolve(name, &scope)
            .map(|(address, _)| address.clone());
        match existing {
            Some(address) => {
                self.update_variable(&address, text, propagation);
                self.substitute_all();
                address
            }
            None => self.bind_variable(name, text, scope),
        }
    }

    /// Change a variable's text and push the change into its bound nodes.
    pub(crate) fn update_variable(
        &mut self,
        address: &Address,
        text: String,
        propagation: Propagation,
    ) {
        let new = text.trim().to_string();
        let Some(old) = self.symbols.set_text(address, text) else {
            return;
        };
        for module in self.trees.iter_mut() {
            match propagation {
                Propagation::Rewrite => rewrite_bound(module, address, old.trim(), &new),
                Propagation::Overwrite => overwrite_bound(module, address, &new),
            }
        }
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("symbols", &self.symbols.len())
            .field("modules", &self.trees.len())
            .field("native", &self.native.is_some())
            .field("call_depth", &self.call_depth)
            .finish()
    }
}
