//! Scanner, compiler, and bytecode VM for the Lox language.
//!
//! A straight port of clox's pipeline — scan, compile straight to
//! bytecode with no separate AST, run on a stack-based VM with a
//! tri-color mark-sweep collector — structured the way `raya-engine`
//! splits an interpreter into independently testable modules (`gc`,
//! `object`, `table`, `vm`) rather than one monolithic file.
//!
//! `vm::Vm::interpret` is the single entry point: hand it source text,
//! get back an [`vm::InterpretOutcome`] describing what happened.

pub mod chunk;
pub mod compiler;
pub mod gc;
pub mod object;
pub mod scanner;
pub mod table;
pub mod value;
pub mod vm;

pub use compiler::CompileError;
pub use value::Value;
pub use vm::{InterpretOutcome, RuntimeError, Vm};
