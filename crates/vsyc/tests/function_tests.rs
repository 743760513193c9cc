//! Function declaration and call tests

use pretty_assertions::assert_eq;
use vsyc::*;

fn run(src: &str) -> Interpreter {
    let mut interp = Interpreter::new(MemoryLoader::new());
    interp.run_source("main", src).expect("run failed");
    interp
}

// ═══════════════════════════════════════════════════════════════════════
// Calls
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_call_returns_substituted_global() {
    let interp = run(
        "@declare \"a = 1\"\n@func {add} (b, c) { @return \"[#a]\" }\n@call \"*add\" (2,3) {out}\n@print \"[#out]\"",
    );
    assert_eq!(interp.output(), ["1"]);
    assert_eq!(interp.variable("out"), Some("1"));
}

#[test]
fn test_arguments_are_bound_as_variables() {
    let interp = run(
        "@func {pick} (b, c) { @return \"[#pick.args.c]\" }\n@call \"*pick\" (2, 3) {out}\n@print \"[#out]\"",
    );
    assert_eq!(interp.output(), ["3"]);
}

#[test]
fn test_repeated_calls_see_fresh_arguments() {
    let interp = run(
        "@func {id} (v) { @return \"[#id.args.v]\" }\n\
         @call \"*id\" (first) {a}\n@call \"*id\" (second) {b}\n@print \"[#a] [#b]\"",
    );
    assert_eq!(interp.output(), ["first second"]);
}

#[test]
fn test_body_statements_run_in_order_until_return() {
    let interp = run(
        "@func {f} () {\n  @print \"one\"\n  @print \"two\"\n  @return \"r\"\n  @print \"never\"\n}\n@call \"*f\" ()",
    );
    assert_eq!(interp.output(), ["one", "two"]);
}

#[test]
fn test_call_without_return_leaves_output_untouched() {
    let interp = run(
        "@declare \"out = before\"\n@func {f} () { @c \"nothing\" }\n@call \"*f\" () {out}",
    );
    assert_eq!(interp.variable("out"), Some("before"));
}

#[test]
fn test_redefinition_replaces_function() {
    let interp = run(
        "@func {f} () { @return \"old\" }\n@func {f} () { @return \"new\" }\n@call \"*f\" () {r}\n@print \"[#r]\"",
    );
    assert_eq!(interp.output(), ["new"]);
    let functions = interp
        .symbols()
        .iter()
        .filter(|s| s.kind() == SymbolKind::Function)
        .count();
    assert_eq!(functions, 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Failures
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_arity_mismatch_skips_the_call() {
    let interp = run(
        "@declare \"out = untouched\"\n@func {f} (a, b) { @print \"ran\"\n @return \"x\" }\n@call \"*f\" (1) {out}\n@print \"done\"",
    );
    assert_eq!(interp.output(), ["done"]);
    assert_eq!(interp.variable("out"), Some("untouched"));
    assert_eq!(
        interp.diagnostics()[0].error,
        EvalError::ArityMismatch {
            expected: 2,
            got: 1,
            name: "f".into()
        }
    );
}

#[test]
fn test_recursion_hits_depth_limit() {
    let mut interp = Interpreter::new(MemoryLoader::new())
        .with_context(EvalContext::with_max_call_depth(8));
    let err = interp
        .run_source("main", "@func {loop} () { @call \"*loop\" () }\n@call \"*loop\" ()")
        .unwrap_err();
    assert_eq!(err, EvalError::StackOverflow { depth: 8, max: 8 });
}
