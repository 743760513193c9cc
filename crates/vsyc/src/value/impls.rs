//! Value constructors, conversions and the loose comparison rules

use std::cmp::Ordering;

use super::*;

impl Value {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Text form stored back into nodes and symbols.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Read a value as a number.
    ///
    /// Text is trimmed and must parse as a finite number; `NaN` and the
    /// infinities spelled as text do not count as numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Equality used by `@eq` and `@op`: numeric when both sides are numeric,
    /// otherwise by text.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_text() == other.to_text(),
        }
    }

    /// Ordering used by `@lt` and `@gt`: numeric first, falling back to a
    /// lexicographic comparison of the text forms.
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => Some(self.to_text().cmp(&other.to_text())),
        }
    }
}

/// Parse trimmed text as a finite number.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
