//! `@call` and `@return`

use tracing::debug;

use super::{split_list, ControlFlow, Interpreter, Keyword, Propagation, Site};
use crate::error::{EvalError, Result};
use crate::node::NodeKind;
use crate::symbols::{Function, Scope};
use crate::value::Value;

/// Marker conventionally prefixed to the function name in `@call "*name"`.
pub const CALL_MARKER: char = '*';

impl Interpreter {
    /// `@call "*name" (args) {out}`.
    ///
    /// The call's value is the function's result; when an `{out}` block
    /// follows, the result is also written into that variable.
    pub(crate) fn eval_call(&mut self, site: Site) -> Result<Option<Value>> {
        let raw_name = self.require(site, Keyword::Call, NodeKind::String, 0)?;
        let raw_args = self.require(site, Keyword::Call, NodeKind::Paren, 0)?;
        let out = self
            .operand(site, NodeKind::Block, 0)
            .map(|idx| self.text_at(site, idx).trim().to_string())
            .filter(|name| !name.is_empty());

        let name = raw_name.trim();
        let name = name.strip_prefix(CALL_MARKER).unwrap_or(name).trim();
        let function = self
            .symbols
            .function(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedFunction {
                name: name.to_string(),
            })?;

        let args = split_list(&raw_args);
        if args.len() != function.params.len() {
            return Err(EvalError::ArityMismatch {
                expected: function.params.len(),
                got: args.len(),
                name: function.name.clone(),
            });
        }

        let result = self.call_function(&function, args)?;

        match (&out, &result) {
            (Some(out), Some(value)) => {
                self.assign_output(site, out, value.to_text(), Propagation::Rewrite);
            }
            (Some(out), None) => {
                debug!(function = %function.name, output = %out, "call returned nothing");
            }
            _ => {}
        }
        Ok(result)
    }

    /// Bind arguments and run a function body against its owning module.
    pub(crate) fn call_function(
        &mut self,
        function: &Function,
        args: Vec<String>,
    ) -> Result<Option<Value>> {
        // Track call depth (stack overflow protection)
        self.enter_call()?;
        debug!(function = %function.name, ?args, depth = self.call_depth, "calling function");

        let scope = Scope::Block {
            module: function.owner,
            index: function.body,
        };
        for (param, arg) in function.params.iter().zip(args) {
            let name = format!("{}.args.{}", function.name, param);
            self.bind_variable(&name, arg, scope);
        }

        let saved = self.trees.set_current(Some(function.owner));
        let result = self.eval_block(function.owner, function.body);
        self.trees.set_current(saved);
        self.exit_call();

        match result {
            Ok(()) => Ok(None),
            Err(EvalError::ControlFlow(flow)) => Ok(Some(flow.into_value())),
            Err(e) => Err(e),
        }
    }

    /// `@return <node>`: end the enclosing call with the next node's value.
    ///
    /// A keyword operand is evaluated and its value returned, so
    /// `@return @call ...` forwards another call's result.
    pub(crate) fn eval_return(&mut self, site: Site) -> Result<Option<Value>> {
        let next = site.index + 1;
        let node = self
            .nodes(site.module)
            .get(next)
            .cloned()
            .ok_or_else(|| EvalError::malformed(Keyword::Return.name(), "nothing to return"))?;

        let value = match node.kind {
            NodeKind::Keyword => self
                .eval_statement(Site::new(site.module, next))?
                .ok_or_else(|| {
                    EvalError::malformed(
                        Keyword::Return.name(),
                        format!("`@{}` produced no value", node.value),
                    )
                })?,
            _ => Value::Text(node.value),
        };
        Err(EvalError::ControlFlow(ControlFlow::return_value(value)))
    }
}
