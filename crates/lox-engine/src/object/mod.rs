//! Heap object types.
//!
//! The object universe is fixed and known at compile time, so rather than
//! clox's single `Obj` struct with a `type` tag the implementation here
//! gives each kind its own Rust type, allocated through [`crate::gc::Heap`]
//! and referenced via [`crate::gc::GcRef`]. [`Obj`] is the tag that a
//! [`crate::value::Value`] actually stores.

mod closure;
mod function;
mod string;
mod upvalue;

pub use closure::ObjClosure;
pub use function::{NativeFn, ObjFunction, ObjNative};
pub use string::{fnv1a_hash, intern, ObjString};
pub use upvalue::{ObjUpvalue, UpvalueState};

use std::ptr::NonNull;

use crate::gc::{GcRef, ObjHeader, ObjKind};

/// A heap object a [`crate::value::Value`] can point to.
///
/// `ObjUpvalue` is deliberately absent: upvalues are an implementation
/// detail of closures, never a value Lox code can hold directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obj {
    Str(GcRef<ObjString>),
    Function(GcRef<ObjFunction>),
    Native(GcRef<ObjNative>),
    Closure(GcRef<ObjClosure>),
}

impl Obj {
    /// The `print`/`to_string` form of a heap object.
    pub fn display(&self) -> String {
        match self {
            Obj::Str(s) => s.as_str().to_string(),
            Obj::Function(f) => function_display(f),
            Obj::Native(_) => "<native fn>".to_string(),
            Obj::Closure(c) => function_display(&c.function),
        }
    }

    /// The type-erased header pointer backing this object, for GC marking
    /// and (under `nan-boxing`) for packing the object into a 48-bit
    /// pointer slot.
    pub fn header_ptr(&self) -> NonNull<ObjHeader> {
        match self {
            Obj::Str(r) => r.header_ptr(),
            Obj::Function(r) => r.header_ptr(),
            Obj::Native(r) => r.header_ptr(),
            Obj::Closure(r) => r.header_ptr(),
        }
    }

    /// Reconstruct a typed `Obj` from an erased header pointer, dispatching
    /// on the header's own `kind` tag.
    ///
    /// # Safety
    /// `ptr` must point at a live `GcBox<T>` whose header kind matches the
    /// type the pointer was originally allocated as.
    pub unsafe fn from_header(ptr: NonNull<ObjHeader>) -> Obj {
        match ptr.as_ref().kind {
            ObjKind::Str => Obj::Str(GcRef::new(ptr.cast())),
            ObjKind::Function => Obj::Function(GcRef::new(ptr.cast())),
            ObjKind::Native => Obj::Native(GcRef::new(ptr.cast())),
            ObjKind::Closure => Obj::Closure(GcRef::new(ptr.cast())),
            ObjKind::Upvalue => {
                unreachable!("upvalues are never stored directly in a Value")
            }
        }
    }
}

impl std::fmt::Display for Obj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// `<fn NAME>` for a named function, `<script>` for the nameless top-level
/// function.
fn function_display(function: &ObjFunction) -> String {
    match function.name {
        Some(name) => format!("<fn {}>", name.as_str()),
        None => "<script>".to_string(),
    }
}
