//! `@func` declarations

use tracing::debug;

use super::{split_list, Interpreter, Keyword, Site};
use crate::error::{EvalError, Result};
use crate::node::NodeKind;
use crate::symbols::{Function, SymbolData};
use crate::value::Value;

impl Interpreter {
    /// `@func {name} (params) {body}`: register a name-keyed function.
    ///
    /// Nothing in the body runs here; the body block's index is recorded so
    /// `@call` can evaluate its children later.
    pub(crate) fn eval_func(&mut self, site: Site) -> Result<Option<Value>> {
        let malformed = |message: &str| EvalError::malformed(Keyword::Func.name(), message);

        let name_idx = self
            .operand(site, NodeKind::Block, 0)
            .ok_or_else(|| malformed("missing {name} block"))?;
        let params_idx = self
            .operand(site, NodeKind::Paren, 0)
            .ok_or_else(|| malformed("missing (parameter) list"))?;
        let body_idx = self
            .operand(site, NodeKind::Block, 1)
            .ok_or_else(|| malformed("missing {body} block"))?;

        if !(name_idx < params_idx && params_idx < body_idx) {
            return Err(malformed("expected {name} (params) {body} in that order"));
        }

        let name = self.text_at(site, name_idx).trim().to_string();
        if name.is_empty() {
            return Err(malformed("function name is empty"));
        }
        let raw_params = self.text_at(site, params_idx);
        let params = split_list(&raw_params);

        debug!(function = %name, ?params, body = body_idx, "declaring function");
        let key = name.clone();
        self.symbols.register(
            SymbolData::Function(Function {
                name,
                raw_params,
                body: body_idx,
                owner: site.module,
                params,
            }),
            Some(&key),
        );
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use crate::host::MemoryLoader;
    use crate::symbols::Address;
    use crate::Interpreter;

    #[test]
    fn test_func_registers_by_name() {
        let mut interp = Interpreter::new(MemoryLoader::new());
        interp
            .run_source("main", "@func {add} (b, c) { @return \"x\" }")
            .unwrap();
        let f = interp.symbols().function("add").unwrap();
        assert_eq!(f.params, vec!["b", "c"]);
        assert_eq!(f.raw_params, "b, c");
        assert_eq!(f.body, 3);
        assert!(interp
            .symbols()
            .lookup(&Address::Named("add".into()))
            .is_some());
    }

    #[test]
    fn test_func_body_does_not_run_at_declaration() {
        let mut interp = Interpreter::new(MemoryLoader::new());
        interp
            .run_source("main", "@func {f} () { @print \"inside\" }")
            .unwrap();
        assert!(interp.output().is_empty());
    }

    #[test]
    fn test_func_missing_parts_is_reported() {
        let mut interp = Interpreter::new(MemoryLoader::new());
        interp
            .run_source("main", "@func {f} { @print \"x\" }\n@func (a) {f}")
            .unwrap();
        assert_eq!(interp.diagnostics().len(), 2);
        assert!(interp.symbols().is_empty());
    }
}
