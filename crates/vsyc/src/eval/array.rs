//! Array variables: `@insert`, `@remove` and `@read`
//!
//! Arrays are never stored as such. A variable holds the serialized text of
//! one, and each edit deserializes, changes and reserializes it.

use tracing::debug;

use super::{split_list, Interpreter, Keyword, Propagation, Site};
use crate::error::{EvalError, Result};
use crate::node::NodeKind;
use crate::symbols::Address;
use crate::value::{format_number, parse_array, parse_number, serialize_array, Value};

/// Conversion applied by `@read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Copy the text unchanged
    String,
    /// Parse as a number and re-render it
    Number,
    /// Take one element of a serialized array
    Array,
}

impl ReadMode {
    /// Parse a mode name.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "string" => Some(ReadMode::String),
            "number" => Some(ReadMode::Number),
            "array" => Some(ReadMode::Array),
            _ => None,
        }
    }
}

impl Interpreter {
    /// `@insert "v" {arr}` / `@remove "v" {arr}`.
    pub(crate) fn eval_array_edit(
        &mut self,
        site: Site,
        keyword: Keyword,
    ) -> Result<Option<Value>> {
        let item = self.require(site, keyword, NodeKind::String, 0)?;
        let name = self.require(site, keyword, NodeKind::Block, 0)?;
        let name = name.trim();

        let (address, text) = self.lookup_variable(site, name)?;
        let mut items = parse_array(&text).map_err(|e| EvalError::MalformedArray {
            variable: name.to_string(),
            message: e.to_string(),
        })?;

        match keyword {
            Keyword::Insert => items.push(Value::text(item.as_str())),
            Keyword::Remove => match items.iter().position(|v| v.to_text() == item) {
                Some(pos) => {
                    items.remove(pos);
                }
                None => debug!(variable = name, item = %item, "nothing to remove"),
            },
            other => return Err(EvalError::malformed(other.name(), "not an array edit")),
        }

        let serialized = serialize_array(&items);
        debug!(variable = name, array = %serialized, "{}", keyword);
        self.update_variable(&address, serialized, Propagation::Rewrite);
        self.substitute_all();
        Ok(None)
    }

    /// `@read "mode" {in} {out}` or `@read "mode" {in} {index, out}`.
    pub(crate) fn eval_read(&mut self, site: Site) -> Result<Option<Value>> {
        let mode_text = self.require(site, Keyword::Read, NodeKind::String, 0)?;
        let input = self.require(site, Keyword::Read, NodeKind::Block, 0)?;
        let spec = self.require(site, Keyword::Read, NodeKind::Block, 1)?;

        let mode = ReadMode::parse(&mode_text).ok_or_else(|| {
            EvalError::malformed(
                Keyword::Read.name(),
                format!("unknown read mode \"{}\"", mode_text.trim()),
            )
        })?;
        let input = input.trim();
        let spec = split_list(&spec);
        let (index, out) = match spec.as_slice() {
            [out] => (None, out.as_str()),
            [index, out] => (Some(index.as_str()), out.as_str()),
            _ => {
                return Err(EvalError::malformed(
                    Keyword::Read.name(),
                    "expected {out} or {index, out}",
                ))
            }
        };

        let (_, text) = self.lookup_variable(site, input)?;
        let value = match mode {
            ReadMode::String => Value::Text(text),
            ReadMode::Number => {
                let n = parse_number(&text).ok_or(EvalError::InvalidNumber { text })?;
                Value::Text(format_number(n))
            }
            ReadMode::Array => {
                let index = index.ok_or_else(|| {
                    EvalError::malformed(Keyword::Read.name(), "array mode needs {index, out}")
                })?;
                let index = index
                    .parse::<usize>()
                    .map_err(|_| EvalError::InvalidNumber {
                        text: index.to_string(),
                    })?;
                let items = parse_array(&text).map_err(|e| EvalError::MalformedArray {
                    variable: input.to_string(),
                    message: e.to_string(),
                })?;
                let len = items.len();
                let item = items
                    .into_iter()
                    .nth(index)
                    .ok_or(EvalError::IndexOutOfBounds { index, len })?;
                Value::Text(item.to_text())
            }
        };

        self.assign_output(site, out, value.to_text(), Propagation::Overwrite);
        Ok(Some(value))
    }

    /// Address and text of the variable `name` visible from `site`.
    fn lookup_variable(&self, site: Site, name: &str) -> Result<(Address, String)> {
        self.symbols
            .resolve(name, &self.scope_of(site))
            .map(|(address, var)| (address.clone(), var.text.clone()))
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: name.to_string(),
            })
    }
}
