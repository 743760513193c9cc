//! Value representation for runtime values
//!
//! Node text is untyped: the same characters may be read as a string, a
//! number, a boolean or a serialized array depending on the statement that
//! consumes them. [`Value`] is the tagged form used whenever the evaluator
//! needs to interpret text, and [`Value::to_text`] turns it back into the text
//! stored in nodes and symbols.

mod display;
mod impls;
mod json;

pub use json::{parse_array, serialize_array};

pub(crate) use display::format_number;
pub(crate) use impls::parse_number;

/// Runtime value representation for the vsyc interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain text
    Text(String),

    /// Floating point number (the only numeric type)
    Number(f64),

    /// Result of a comparison
    Bool(bool),

    /// Deserialized array payload
    Array(Vec<Value>),
}
