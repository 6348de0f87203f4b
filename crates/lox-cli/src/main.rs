//! `lox` — run a Lox script, or start an interactive REPL with none given.
//!
//! Grounded on `examples/original_source/c/source/main.c`'s `argc`
//! dispatch (no args → REPL, one arg → run that file, anything else →
//! usage error) and its exact exit codes. Deliberately not built on
//! `clap`'s derive macros: those exit-code boundaries (64 usage, 65
//! compile error, 70 runtime error, 74 I/O failure) are part of the
//! observable contract, and clap's own usage-error handling doesn't let
//! every one of them through cleanly, so argv is inspected directly.

mod output;
mod repl;

use std::process::ExitCode;

use lox_engine::Vm;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    match args.len() {
        1 => match repl::run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err:#}");
                ExitCode::from(74)
            }
        },
        2 => run_file(&args[1]),
        _ => {
            eprintln!("Usage: lox [path]");
            ExitCode::from(64)
        }
    }
}

fn run_file(path: &str) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Could not read file \"{path}\": {err}");
            return ExitCode::from(74);
        }
    };

    let mut vm = Vm::new();
    let outcome = vm.interpret(&source);
    ExitCode::from(output::report(&outcome) as u8)
}
