//! Runtime error types and the overall outcome of an `interpret` call.
//!
//! The VM itself never prints: it hands back a structured [`InterpretOutcome`]
//! and lets the caller decide how to render it, the same division of labor
//! [`crate::compiler::compile`] already uses for compile errors. This keeps
//! the engine testable (assert on the enum, not on captured stderr text) and
//! mirrors `raya-engine`'s convention of returning typed errors up to the
//! CLI boundary rather than formatting inside the runtime.

use thiserror::Error;

/// One frame of a runtime-error backtrace, formatted `[line N] in <name>`
/// by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFrame {
    pub line: u32,
    /// The function's own name, or `"script"` for the top-level frame.
    pub name: String,
}

/// Every way executing bytecode can fail after it has already compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or strings.")]
    OperandsMustBeNumbersOrStrings,
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),
    #[error("Can only call functions.")]
    NotCallable,
    #[error("Expected {expected} arguments but got {got}.")]
    ArityMismatch { expected: u8, got: u8 },
    #[error("Stack overflow.")]
    StackOverflow,
}

/// What happened when running a piece of source to completion, mirroring
/// clox's `InterpretResult` enum (`INTERPRET_OK` / `_COMPILE_ERROR` /
/// `_RUNTIME_ERROR`) but carrying the diagnostics needed to report them.
#[derive(Debug)]
pub enum InterpretOutcome {
    Ok,
    CompileError(Vec<crate::compiler::CompileError>),
    RuntimeError {
        error: RuntimeError,
        trace: Vec<TraceFrame>,
    },
}

impl InterpretOutcome {
    /// The process exit code this outcome maps to (64 is reserved for CLI
    /// usage errors, decided above the VM).
    pub fn exit_code(&self) -> i32 {
        match self {
            InterpretOutcome::Ok => 0,
            InterpretOutcome::CompileError(_) => 65,
            InterpretOutcome::RuntimeError { .. } => 70,
        }
    }
}
