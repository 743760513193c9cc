//! `@print` and `@declare`

use super::{Interpreter, Keyword, Site};
use crate::error::{EvalError, Result};
use crate::node::NodeKind;
use crate::value::Value;

impl Interpreter {
    /// `@print "text"`: emit the string's current (substituted) text.
    pub(crate) fn eval_print(&mut self, site: Site) -> Result<Option<Value>> {
        let line = self.require(site, Keyword::Print, NodeKind::String, 0)?;
        if self.ctx.echo {
            println!("{}", line);
        }
        self.output.push(line);
        Ok(None)
    }

    /// `@declare "name = value"`: bind `name` in the statement's scope.
    ///
    /// Declaring a name the scope already holds reassigns it.
    pub(crate) fn eval_declare(&mut self, site: Site) -> Result<Option<Value>> {
        let text = self.require(site, Keyword::Declare, NodeKind::String, 0)?;
        let (name, value) = text
            .split_once('=')
            .map(|(name, value)| (name.trim(), value.trim()))
            .filter(|(name, value)| !name.is_empty() && !value.is_empty())
            .ok_or_else(|| {
                EvalError::malformed(
                    Keyword::Declare.name(),
                    format!("\"{}\" is not a valid variable declaration", text),
                )
            })?;

        let scope = self.scope_of(site);
        self.bind_variable(name, value.to_string(), scope);
        Ok(None)
    }
}
