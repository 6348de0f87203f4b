//! Native (host-provided) functions exposed to Lox code.

use std::sync::OnceLock;
use std::time::Instant;

use crate::value::Value;

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

/// `clock()` — seconds elapsed since the process started, matching clox's
/// `clockNative` (which uses `clock() / CLOCKS_PER_SEC` against process
/// start). A lazily-initialized `Instant` gives the same reference point
/// without threading VM state through a plain `fn` pointer.
pub fn clock(_args: &[Value]) -> Value {
    let start = PROCESS_START.get_or_init(Instant::now);
    Value::number(start.elapsed().as_secs_f64())
}
