//! `@if` evaluation

use tracing::debug;

use super::{Interpreter, Keyword, Site};
use crate::error::{EvalError, Result};
use crate::node::{NodeKind, NodeQuery};
use crate::trees::ModuleId;
use crate::value::Value;

impl Interpreter {
    /// `@if {label} do: {body}`.
    ///
    /// The condition is the first `@eq`, `@lt` or `@gt` in the current module,
    /// wherever it sits; the label block only names the condition for the
    /// reader. The body's statements run when the condition holds.
    pub(crate) fn eval_if(&mut self, site: Site) -> Result<Option<Value>> {
        let label = self.require(site, Keyword::If, NodeKind::Block, 0)?;
        let body = self
            .operand(site, NodeKind::Block, 1)
            .ok_or_else(|| EvalError::malformed(Keyword::If.name(), "missing {body} block"))?;

        let module = self.trees.current().unwrap_or(site.module);
        let condition = self.find_condition(module).ok_or_else(|| {
            EvalError::malformed(
                Keyword::If.name(),
                format!("no comparison found for condition `{}`", label.trim()),
            )
        })?;

        let holds = self.eval_comparison(Site::new(module, condition))?;
        debug!(label = %label.trim(), condition, holds, "if");
        if holds {
            self.eval_block(site.module, body)?;
        }
        Ok(Some(Value::Bool(holds)))
    }

    fn find_condition(&self, module: ModuleId) -> Option<usize> {
        let nodes = self.nodes(module);
        let mut from = 0;
        while let Some(idx) = nodes.next_of_kind(NodeKind::Keyword, from) {
            if Keyword::parse(&nodes[idx].value).is_some_and(Keyword::is_condition) {
                return Some(idx);
            }
            from = idx + 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::error::EvalError;
    use crate::host::MemoryLoader;
    use crate::Interpreter;

    fn run(src: &str) -> Interpreter {
        let mut interp = Interpreter::new(MemoryLoader::new());
        interp.run_source("main", src).unwrap();
        interp
    }

    #[test]
    fn test_if_true_runs_body() {
        let interp = run("@eq {1} {1.0}\n@if {same} do: {\n  @print \"yes\"\n}");
        assert_eq!(interp.output(), ["yes"]);
    }

    #[test]
    fn test_if_false_skips_body() {
        let interp = run("@lt {10} {9}\n@if {smaller} do: { @print \"yes\" }\n@print \"end\"");
        assert_eq!(interp.output(), ["end"]);
    }

    #[test]
    fn test_first_comparison_in_module_wins() {
        // The second comparison is the one written next to the @if, but the
        // first one in the module decides.
        let interp = run("@gt {1} {2}\n@eq {1} {1}\n@if {c} { @print \"ran\" }");
        assert!(interp.output().is_empty());
    }

    #[test]
    fn test_if_without_comparison_is_malformed() {
        let interp = run("@if {c} do: { @print \"x\" }");
        assert!(interp.output().is_empty());
        assert!(matches!(
            interp.diagnostics()[0].error,
            EvalError::MalformedStatement { .. }
        ));
    }

    #[test]
    fn test_declare_inside_if_body_is_block_scoped() {
        let interp = run("@eq {a} {a}\n@if {c} do: { @declare \"x = 1\" }");
        assert_eq!(interp.variable("x"), None);
        assert_eq!(interp.symbols().len(), 1);
    }
}
