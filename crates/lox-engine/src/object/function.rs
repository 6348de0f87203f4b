//! Compiled functions and native (host-provided) functions.

use crate::chunk::Chunk;
use crate::gc::GcRef;
use crate::value::Value;

use super::ObjString;

/// A compiled Lox function: its arity, the bytecode that implements its
/// body, and how many upvalues its closures need to capture.
///
/// `name` is `None` for the implicit top-level script function, matching
/// clox's `ObjFunction.name == NULL` convention; the `<script>` print form
/// reads this field.
#[derive(Debug)]
pub struct ObjFunction {
    pub arity: u8,
    pub upvalue_count: u8,
    pub chunk: Chunk,
    pub name: Option<GcRef<ObjString>>,
}

impl ObjFunction {
    pub fn new(name: Option<GcRef<ObjString>>) -> Self {
        Self {
            arity: 0,
            upvalue_count: 0,
            chunk: Chunk::new(),
            name,
        }
    }

    /// The name used in printed form and stack traces: the function's own
    /// name, or `"script"` for the implicit top-level function.
    pub fn display_name(&self) -> String {
        match self.name {
            Some(name) => name.as_str().to_string(),
            None => "script".to_string(),
        }
    }
}

/// Signature for a native function exposed to Lox code.
///
/// Natives in this engine (just `clock`) cannot fail, so unlike the
/// bytecode-level call protocol there is no error channel here; a native
/// that needs to signal failure would extend this to return a `Result`.
pub type NativeFn = fn(args: &[Value]) -> Value;

/// A host function callable from Lox, identified only by its function
/// pointer (clox's `ObjNative`, which carries no arity of its own — a
/// native is invoked with whatever argument count the call site passed).
#[derive(Debug, Clone, Copy)]
pub struct ObjNative {
    pub function: NativeFn,
}

impl ObjNative {
    pub fn new(function: NativeFn) -> Self {
        Self { function }
    }
}
