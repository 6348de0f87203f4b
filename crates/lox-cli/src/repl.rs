//! Interactive REPL.
//!
//! Grounded on `raya-cli`'s `commands::repl` for the `rustyline` editor /
//! history-file / prompt plumbing, simplified to Lox's much smaller
//! surface: no multi-line continuation detection or bare-expression
//! auto-wrapping (Lox has no implicit `return` of the last expression;
//! every statement must end in `;`), and no REPL-only commands — just
//! `print` statements feeding back into a single persistent [`lox_engine::Vm`].

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use lox_engine::Vm;

const PROMPT: &str = "> ";

/// clox's REPL reads each line with `fgets(line, 1024, stdin)`, silently
/// dropping anything past the 1024th byte. `rustyline` has no such cap,
/// so it's applied here to preserve that boundary behavior.
const MAX_LINE_BYTES: usize = 1024;

fn truncate_to_line_cap(line: &str) -> &str {
    if line.len() <= MAX_LINE_BYTES {
        return line;
    }
    let mut end = MAX_LINE_BYTES;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

pub fn run() -> anyhow::Result<()> {
    let mut vm = Vm::new();
    let mut editor = DefaultEditor::new()?;

    let history_path = dirs::home_dir().map(|home| home.join(".lox_history"));
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let outcome = vm.interpret(truncate_to_line_cap(&line));
                crate::output::report(&outcome);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{err}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }

    Ok(())
}
