//! `@execjs`: the native call seam

use tracing::debug;

use super::{Interpreter, Keyword, Propagation, Site};
use crate::error::{EvalError, Result};
use crate::node::NodeKind;
use crate::value::Value;

impl Interpreter {
    /// `@execjs "source" {out}`: hand the string to the host's [`NativeCall`]
    /// and store its result.
    ///
    /// [`NativeCall`]: crate::host::NativeCall
    pub(crate) fn eval_execjs(&mut self, site: Site) -> Result<Option<Value>> {
        let source = self.require(site, Keyword::ExecJs, NodeKind::String, 0)?;
        let out = self
            .operand(site, NodeKind::Block, 0)
            .map(|idx| self.text_at(site, idx).trim().to_string())
            .filter(|name| !name.is_empty());

        let native = self.native.as_mut().ok_or(EvalError::NativeDisabled)?;
        let result = native
            .invoke(&source)
            .map_err(|message| EvalError::NativeFailed { message })?;
        debug!(source = %source, result = %result, "native call");

        if let Some(out) = out {
            self.assign_output(site, &out, result.clone(), Propagation::Rewrite);
        }
        Ok(Some(Value::Text(result)))
    }
}
