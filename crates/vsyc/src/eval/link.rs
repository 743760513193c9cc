//! Module linking: `@usingfile` and `@exportall`

use tracing::{debug, info};

use super::{Interpreter, Keyword, Site};
use crate::error::{EvalError, Result};
use crate::node::NodeKind;
use crate::value::Value;

impl Interpreter {
    /// `@usingfile "name"`: load and evaluate another source as its own module.
    ///
    /// Everything the imported module declares lands in the shared symbol
    /// table. A module that is already loaded is not loaded again, which is
    /// also what stops import cycles.
    pub(crate) fn eval_usingfile(&mut self, site: Site) -> Result<Option<Value>> {
        let name = self.require(site, Keyword::UsingFile, NodeKind::String, 0)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(EvalError::malformed(
                Keyword::UsingFile.name(),
                "empty source name",
            ));
        }
        if self.trees.id_of(name).is_some() {
            debug!(module = name, "already loaded");
            return Ok(None);
        }

        let source = self.loader.load(name)?;
        info!(module = name, bytes = source.len(), "importing");

        self.enter_call()?;
        let result = self.run_source(name, &source);
        self.exit_call();
        let id = result?;

        if let Some(exports) = self.trees.get(id).and_then(|m| m.exports()) {
            debug!(module = name, exports = exports.len(), "module exported its symbols");
        }
        Ok(None)
    }

    /// `@exportall`: snapshot every symbol address registered so far onto the
    /// current module.
    pub(crate) fn eval_exportall(&mut self, site: Site) -> Result<Option<Value>> {
        let addresses = self.symbols.addresses();
        let module = self.trees.current().unwrap_or(site.module);
        if let Some(module) = self.trees.get_mut(module) {
            debug!(module = module.name(), symbols = addresses.len(), "exportall");
            module.set_exports(addresses);
        }
        Ok(None)
    }
}
