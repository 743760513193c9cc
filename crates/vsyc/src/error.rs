//! Error types for vsyc evaluation

use thiserror::Error;

use crate::eval::ControlFlow;

/// Errors raised while evaluating a script.
///
/// Most variants describe a single failed statement: the evaluator logs them,
/// keeps them as diagnostics and moves on to the next statement. The variants
/// for which [`EvalError::is_recoverable`] returns `false` abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A statement is missing one of the nodes it requires
    #[error("malformed `@{keyword}` statement: {message}")]
    MalformedStatement {
        /// Keyword of the failed statement
        keyword: String,
        /// What was wrong with it
        message: String,
    },

    /// Keyword is neither implemented nor in the informational allow-list
    #[error("unknown keyword: `@{keyword}`")]
    UnknownKeyword {
        /// The keyword text
        keyword: String,
    },

    /// Call to a function that was never declared
    #[error("cannot find function `{name}`")]
    UndefinedFunction {
        /// Function name after marker stripping
        name: String,
    },

    /// Reference to a variable that is not visible from the statement
    #[error("cannot find variable `{name}`")]
    UndefinedVariable {
        /// Variable name
        name: String,
    },

    /// Call supplied the wrong number of arguments
    #[error("function `{name}` takes {expected} argument(s) but {got} were supplied")]
    ArityMismatch {
        /// Expected parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
        /// Function name
        name: String,
    },

    /// Variable text is not a serialized array
    #[error("variable `{variable}` does not hold an array: {message}")]
    MalformedArray {
        /// Variable name
        variable: String,
        /// Deserializer message
        message: String,
    },

    /// Text could not be read as a number
    #[error("`{text}` is not a number")]
    InvalidNumber {
        /// The offending text
        text: String,
    },

    /// Array element index past the end
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// `@execjs` used while no native capability is installed
    #[error("native calls are disabled")]
    NativeDisabled,

    /// The native capability reported a failure
    #[error("native call failed: {message}")]
    NativeFailed {
        /// Message from the capability
        message: String,
    },

    /// A `@return` reached top level
    #[error("`@return` outside of a function")]
    ReturnOutsideFunction,

    /// A module with this name is already loaded
    #[error("module `{name}` is already loaded")]
    DuplicateModule {
        /// Module name
        name: String,
    },

    /// Source could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Nested calls or imports exceeded the configured depth
    #[error("call depth exceeded: depth {depth} >= max {max}")]
    StackOverflow {
        /// Depth at the failing call
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Evaluation was interrupted by the host
    #[error("evaluation interrupted")]
    Interrupted,

    /// Non-local control flow (internal use)
    #[error("control flow: {0:?}")]
    ControlFlow(ControlFlow),
}

impl EvalError {
    /// Whether the evaluator may skip the failing statement and continue.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            EvalError::Load(_)
                | EvalError::DuplicateModule { .. }
                | EvalError::StackOverflow { .. }
                | EvalError::Interrupted
                | EvalError::ControlFlow(_)
        )
    }

    pub(crate) fn malformed(keyword: &str, message: impl Into<String>) -> Self {
        EvalError::MalformedStatement {
            keyword: keyword.to_string(),
            message: message.into(),
        }
    }
}

/// Failure reported by a [`SourceLoader`](crate::host::SourceLoader).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No source with that name
    #[error("source `{name}` not found")]
    NotFound {
        /// Requested name
        name: String,
    },

    /// The underlying storage failed
    #[error("failed to read `{name}`: {message}")]
    Io {
        /// Requested name
        name: String,
        /// I/O error text
        message: String,
    },
}

/// Result type alias for vsyc operations
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_statement_errors_are_recoverable() {
        assert!(EvalError::malformed("func", "missing body").is_recoverable());
        assert!(EvalError::UnknownKeyword {
            keyword: "frob".into()
        }
        .is_recoverable());
        assert!(EvalError::NativeDisabled.is_recoverable());
        assert!(EvalError::ReturnOutsideFunction.is_recoverable());
    }

    #[test]
    fn test_fatal_errors() {
        let load = EvalError::from(LoadError::NotFound { name: "a".into() });
        assert!(!load.is_recoverable());
        assert!(!EvalError::Interrupted.is_recoverable());
        assert!(!EvalError::StackOverflow { depth: 3, max: 3 }.is_recoverable());
        assert!(!EvalError::ControlFlow(ControlFlow::return_value(Value::text("x")))
            .is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = EvalError::ArityMismatch {
            expected: 2,
            got: 1,
            name: "add".into(),
        };
        assert_eq!(
            err.to_string(),
            "function `add` takes 2 argument(s) but 1 were supplied"
        );
        let err = EvalError::from(LoadError::NotFound {
            name: "lib.vscc".into(),
        });
        assert_eq!(err.to_string(), "source `lib.vscc` not found");
    }
}
