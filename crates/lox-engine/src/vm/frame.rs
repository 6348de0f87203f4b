//! Call frames.
//!
//! clox keeps a fixed-size C array of 64 `CallFrame`s on the C stack, a
//! trick for avoiding a heap allocation per call with no idiomatic Rust
//! equivalent worth the `unsafe` it would take. A growable `Vec` with an
//! explicit length check against [`FRAMES_MAX`] produces the identical
//! observable behavior (a "Stack overflow." runtime error at the same
//! recursion depth) without pretending to be a fixed array.

use crate::gc::GcRef;
use crate::object::ObjClosure;

/// Maximum live call frames before the VM reports a stack overflow.
pub const FRAMES_MAX: usize = 64;

/// One activation record: which closure is running, where its instruction
/// pointer is, and where its locals begin on the value stack.
pub struct CallFrame {
    pub closure: GcRef<ObjClosure>,
    pub ip: usize,
    pub slots_base: usize,
}
