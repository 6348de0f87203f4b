//! Compile-time limits on parameter count, local-variable count,
//! constant-pool size, and jump-offset range.

use lox_engine::{InterpretOutcome, Vm};

fn compile_errors(source: &str) -> Vec<String> {
    let mut vm = Vm::new();
    match vm.interpret(source) {
        InterpretOutcome::CompileError(errors) => {
            errors.into_iter().map(|e| e.message).collect()
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn two_hundred_fifty_five_parameters_is_fine() {
    let params = (0..255).map(|i| format!("p{i}")).collect::<Vec<_>>().join(", ");
    let source = format!("fun f({params}) {{ return 0; }}");
    let mut vm = Vm::new();
    assert!(matches!(vm.interpret(&source), InterpretOutcome::Ok));
}

#[test]
fn two_hundred_fifty_six_parameters_is_a_compile_error() {
    let params = (0..256).map(|i| format!("p{i}")).collect::<Vec<_>>().join(", ");
    let source = format!("fun f({params}) {{ return 0; }}");
    let errors = compile_errors(&source);
    assert!(errors.iter().any(|m| m.contains("Can't have more than 255 parameters")));
}

#[test]
fn two_hundred_fifty_six_arguments_at_a_call_site_is_a_compile_error() {
    // Every argument is the same local parameter (`GET_LOCAL`, no constant
    // pool entry) so this exercises the argument-count limit in isolation
    // from the constant-pool limit.
    let args = vec!["x"; 256].join(", ");
    let source = format!("fun f() {{}} fun g(x) {{ f({args}); }}");
    let errors = compile_errors(&source);
    assert!(errors.iter().any(|m| m.contains("Can't have more than 255 arguments")));
}

#[test]
fn two_hundred_fifty_six_locals_in_one_scope_is_a_compile_error() {
    // Slot 0 is reserved for the function itself, so the 256-entry local
    // array holds at most 255 *user* locals inside a function body's top
    // scope; the 256th `var` is the one that overflows it.
    let decls: String = (0..256).map(|i| format!("var v{i} = {i};")).collect();
    let source = format!("fun f() {{ {decls} }}");
    let errors = compile_errors(&source);
    assert!(errors
        .iter()
        .any(|m| m.contains("Too many local variables in function")));
}

#[test]
fn two_hundred_fifty_five_locals_in_one_scope_is_fine() {
    let decls: String = (0..255).map(|i| format!("var v{i} = {i};")).collect();
    let source = format!("fun f() {{ {decls} }}");
    let mut vm = Vm::new();
    assert!(matches!(vm.interpret(&source), InterpretOutcome::Ok));
}

#[test]
fn a_then_branch_longer_than_sixty_five_thousand_bytes_is_a_compile_error() {
    // `nil;` compiles to `OP_NIL` + `OP_POP`, 2 bytes, and touches no
    // constant, so the branch body can be inflated past the 16-bit jump
    // offset's `u16::MAX` ceiling without separately overflowing the
    // constant pool.
    let body: String = std::iter::repeat("nil;").take(40_000).collect();
    let source = format!("if (true) {{ {body} }}");
    let errors = compile_errors(&source);
    assert!(errors.iter().any(|m| m.contains("Too much code to jump over")));
}

#[test]
fn a_loop_body_longer_than_sixty_five_thousand_bytes_is_a_compile_error() {
    let body: String = std::iter::repeat("nil;").take(40_000).collect();
    let source = format!("while (false) {{ {body} }}");
    let errors = compile_errors(&source);
    assert!(errors.iter().any(|m| m.contains("Loop body too large")));
}

#[test]
fn more_than_two_hundred_fifty_six_constants_is_a_compile_error() {
    // Each statement below introduces a fresh numeric constant; slot 0 of
    // the reserved local aside, a flat sequence of 300 distinct number
    // literals overflows the 256-entry, 1-byte-indexed constant pool.
    let body: String = (0..300).map(|i| format!("print {}.5;", i)).collect();
    let errors = compile_errors(&body);
    assert!(errors.iter().any(|m| m.contains("Too many constants in one chunk")));
}
