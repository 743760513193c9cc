//! Comparison keywords: `@eq`, `@lt`, `@gt` and `@op`

use std::cmp::Ordering;

use super::{Interpreter, Keyword, Site};
use crate::error::{EvalError, Result};
use crate::node::NodeKind;
use crate::value::Value;

impl Interpreter {
    /// Evaluate the comparison statement at `site` over its two block operands.
    ///
    /// Both sides compare numerically when both read as numbers, and as text
    /// otherwise. `@op` is the negation of `@eq`.
    pub(crate) fn eval_comparison(&mut self, site: Site) -> Result<bool> {
        let word = self.text_at(site, site.index);
        let keyword = Keyword::parse(&word).ok_or_else(|| EvalError::UnknownKeyword {
            keyword: word.clone(),
        })?;

        let left = Value::text(self.require(site, keyword, NodeKind::Block, 0)?.trim());
        let right = Value::text(self.require(site, keyword, NodeKind::Block, 1)?.trim());

        let result = match keyword {
            Keyword::Eq => left.loose_eq(&right),
            Keyword::Op => !left.loose_eq(&right),
            Keyword::Lt => left.loose_cmp(&right) == Some(Ordering::Less),
            Keyword::Gt => left.loose_cmp(&right) == Some(Ordering::Greater),
            other => {
                return Err(EvalError::malformed(
                    other.name(),
                    "not a comparison keyword",
                ))
            }
        };
        tracing::trace!(%keyword, %left, %right, result, "comparison");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::eval::Site;
    use crate::host::MemoryLoader;
    use crate::trees::ModuleId;
    use crate::Interpreter;

    fn compare(src: &str) -> bool {
        let mut interp = Interpreter::new(MemoryLoader::new());
        let id = interp.run_source("main", src).unwrap();
        interp.eval_comparison(Site::new(id, 0)).unwrap()
    }

    #[test]
    fn test_eq_numeric_and_text() {
        assert!(compare("@eq {1} {1.0}"));
        assert!(compare("@eq { abc } {abc}"));
        assert!(!compare("@eq {1} {one}"));
    }

    #[test]
    fn test_lt_gt() {
        assert!(compare("@lt {9} {10}"));
        assert!(!compare("@gt {9} {10}"));
        // Text comparison is lexicographic
        assert!(compare("@gt {9a} {10a}"));
        assert!(compare("@lt {apple} {banana}"));
    }

    #[test]
    fn test_op_negates_eq() {
        assert!(compare("@op {1} {2}"));
        assert!(!compare("@op {2} {2}"));
    }

    #[test]
    fn test_missing_operand_is_malformed() {
        let mut interp = Interpreter::new(MemoryLoader::new());
        interp.run_source("main", "@eq {1}").unwrap();
        assert_eq!(interp.diagnostics().len(), 1);
        assert!(interp.eval_comparison(Site::new(ModuleId(0), 0)).is_err());
    }
}
