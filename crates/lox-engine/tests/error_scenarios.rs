//! Compile errors, runtime errors, and the exit codes they map to.

use lox_engine::compiler::AtContext;
use lox_engine::vm::RuntimeError;
use lox_engine::{InterpretOutcome, Vm};

fn interpret(source: &str) -> InterpretOutcome {
    let mut output = Vec::new();
    let mut vm = Vm::with_stdout(&mut output);
    vm.interpret(source)
}

#[test]
fn undefined_global_is_a_runtime_error_with_exit_70() {
    let outcome = interpret("print a;");
    match &outcome {
        InterpretOutcome::RuntimeError { error, .. } => {
            assert_eq!(*error, RuntimeError::UndefinedVariable("a".to_string()));
        }
        other => panic!("expected a runtime error, got {other:?}"),
    }
    assert_eq!(outcome.exit_code(), 70);
}

#[test]
fn adding_number_and_string_is_a_runtime_error() {
    let outcome = interpret(r#"1 + "x";"#);
    assert!(matches!(
        &outcome,
        InterpretOutcome::RuntimeError {
            error: RuntimeError::OperandsMustBeNumbersOrStrings,
            ..
        }
    ));
}

#[test]
fn return_at_top_level_is_a_compile_error_with_exit_65() {
    let outcome = interpret("return 1;");
    match &outcome {
        InterpretOutcome::CompileError(errors) => {
            assert!(!errors.is_empty());
            assert!(errors[0].message.contains("Can't return from top-level code"));
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
    assert_eq!(outcome.exit_code(), 65);
}

#[test]
fn reading_a_local_in_its_own_initializer_is_a_compile_error() {
    let outcome = interpret("{ var a = a; }");
    match &outcome {
        InterpretOutcome::CompileError(errors) => {
            assert!(errors
                .iter()
                .any(|e| e.message.contains("Can't read local variable in its own initializer")));
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn calling_a_non_callable_value_is_a_runtime_error() {
    let outcome = interpret(r#"var x = 1; x();"#);
    assert!(matches!(
        &outcome,
        InterpretOutcome::RuntimeError {
            error: RuntimeError::NotCallable,
            ..
        }
    ));
}

#[test]
fn wrong_argument_count_is_a_runtime_error() {
    let outcome = interpret("fun f(a, b) { return a + b; } f(1);");
    assert!(matches!(
        &outcome,
        InterpretOutcome::RuntimeError {
            error: RuntimeError::ArityMismatch { expected: 2, got: 1 },
            ..
        }
    ));
}

#[test]
fn setting_an_undefined_global_reports_undefined_variable_without_leaking_it() {
    // A single persistent VM across two REPL-style `interpret` calls: the
    // first assignment must fail *and* not silently create the global, so
    // the second line sees `x` as undefined too instead of `2`.
    let mut output = Vec::new();
    let mut vm = Vm::with_stdout(&mut output);

    let first = vm.interpret("x = 1;");
    assert!(matches!(
        &first,
        InterpretOutcome::RuntimeError {
            error: RuntimeError::UndefinedVariable(name),
            ..
        } if name == "x"
    ));

    let second = vm.interpret("x = 2;");
    assert!(matches!(
        &second,
        InterpretOutcome::RuntimeError {
            error: RuntimeError::UndefinedVariable(name),
            ..
        } if name == "x"
    ));
}

#[test]
fn duplicate_local_declaration_in_same_scope_is_a_compile_error() {
    let outcome = interpret("{ var a = 1; var a = 2; }");
    match &outcome {
        InterpretOutcome::CompileError(errors) => {
            assert!(errors
                .iter()
                .any(|e| e.message.contains("Already a variable with this name in this scope")));
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn unterminated_block_reports_error_at_eof() {
    // A missing `}` runs the parser off the end of the source: the error
    // must be reported "at EOF", distinct both from an error pinned to a
    // specific lexeme and from a scanner-originated error token with no
    // context at all.
    let outcome = interpret("fun f() { print 1;");
    match &outcome {
        InterpretOutcome::CompileError(errors) => {
            assert!(errors.iter().any(|e| e.at == Some(AtContext::Eof)));
            assert!(errors.iter().any(|e| e.to_string().contains("at EOF")));
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn compile_errors_report_every_diagnostic_in_one_pass() {
    // Two independent top-level `return`s: `synchronize()` recovers at the
    // semicolon between them, so both get reported instead of only the
    // first.
    let outcome = interpret("return 1; return 2;");
    match &outcome {
        InterpretOutcome::CompileError(errors) => {
            assert_eq!(errors.len(), 2, "expected both errors to be reported, got {errors:?}");
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
}
