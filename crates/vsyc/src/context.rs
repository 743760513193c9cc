//! Evaluation context configuration

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default limit on nested calls and imports.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Configuration and state for evaluation.
///
/// This is consulted before every statement and controls behavior like
/// recursion limits, interruption and print echoing.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Maximum depth of nested calls and imports
    pub max_call_depth: usize,

    /// Interrupt flag - set to true to abort evaluation
    pub interrupt: Arc<AtomicBool>,

    /// Also write `@print` output to stdout
    pub echo: bool,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            interrupt: Arc::new(AtomicBool::new(false)),
            echo: false,
        }
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Echo prints to stdout, builder style.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Check if evaluation has been interrupted.
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }

    /// Request interruption of evaluation.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Reset the interrupt flag.
    pub fn reset_interrupt(&self) {
        self.interrupt.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = EvalContext::new();
        assert_eq!(ctx.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
        assert!(!ctx.echo);
        assert!(!ctx.is_interrupted());
    }

    #[test]
    fn test_interrupt_is_shared_between_clones() {
        let ctx = EvalContext::with_max_call_depth(4).echo(true);
        let handle = ctx.clone();
        handle.interrupt();
        assert!(ctx.is_interrupted());
        ctx.reset_interrupt();
        assert!(!handle.is_interrupted());
        assert_eq!(ctx.max_call_depth, 4);
        assert!(ctx.echo);
    }
}
