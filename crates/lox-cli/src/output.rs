//! Colored diagnostic printing.
//!
//! Scaled down from `raya-cli`'s `output::StyledOutput` (which also does
//! success/warning badges for `raya test`) to the one thing this CLI's
//! diagnostics need: red bold error text on stderr, respecting `NO_COLOR`
//! the same way.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use lox_engine::vm::TraceFrame;
use lox_engine::{CompileError, InterpretOutcome, RuntimeError};

fn color_choice() -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

fn stderr_error(line: &str) {
    let mut stderr = StandardStream::stderr(color_choice());
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Red)).set_bold(true);
    let _ = stderr.set_color(&spec);
    let _ = writeln!(stderr, "{line}");
    let _ = stderr.reset();
}

fn print_compile_errors(errors: &[CompileError]) {
    for error in errors {
        stderr_error(&error.to_string());
    }
}

fn print_runtime_error(error: &RuntimeError, trace: &[TraceFrame]) {
    stderr_error(&error.to_string());
    for frame in trace {
        stderr_error(&format!("[line {}] in {}", frame.line, frame.name));
    }
}

/// Print whatever diagnostics `outcome` carries. Returns the process exit
/// code it maps to.
pub fn report(outcome: &InterpretOutcome) -> i32 {
    match outcome {
        InterpretOutcome::Ok => {}
        InterpretOutcome::CompileError(errors) => print_compile_errors(errors),
        InterpretOutcome::RuntimeError { error, trace } => print_runtime_error(error, trace),
    }
    outcome.exit_code()
}
