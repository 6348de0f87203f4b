//! NaN-boxed `Value` encoding, selected by the `nan-boxing` feature.
//!
//! Bit layout is taken verbatim from
//! `examples/original_source/c/source/value.h`'s NaN-boxing branch:
//! every non-number value is encoded as a quiet NaN with a tag (or, for
//! objects, a pointer) packed into the low 48 bits, since x86-64 and
//! AArch64 pointers never use more than 48 bits.

use std::ptr::NonNull;

use crate::gc::ObjHeader;
use crate::object::Obj;

const SIGN_BIT: u64 = 0x8000_0000_0000_0000;
const QNAN: u64 = 0x7ffc_0000_0000_0000;

const TAG_NIL: u64 = 1;
const TAG_FALSE: u64 = 2;
const TAG_TRUE: u64 = 3;

/// A Lox value packed into a single `u64`.
///
/// Numbers are stored as their raw IEEE-754 bits. Everything else is
/// encoded as a quiet NaN: `nil`/`true`/`false` via a 2-bit tag in the
/// mantissa, objects via `SIGN_BIT` plus a 48-bit pointer.
#[derive(Clone, Copy)]
pub struct Value(u64);

impl Value {
    pub fn nil() -> Value {
        Value(QNAN | TAG_NIL)
    }

    pub fn boolean(b: bool) -> Value {
        Value(QNAN | if b { TAG_TRUE } else { TAG_FALSE })
    }

    pub fn number(n: f64) -> Value {
        Value(n.to_bits())
    }

    pub fn obj(o: Obj) -> Value {
        let ptr = o.header_ptr().as_ptr() as u64;
        Value(SIGN_BIT | QNAN | ptr)
    }

    fn is_qnan_tagged(&self) -> bool {
        (self.0 & QNAN) == QNAN
    }

    pub fn is_nil(&self) -> bool {
        self.0 == (QNAN | TAG_NIL)
    }

    pub fn is_bool(&self) -> bool {
        self.0 == (QNAN | TAG_TRUE) || self.0 == (QNAN | TAG_FALSE)
    }

    pub fn is_number(&self) -> bool {
        !self.is_qnan_tagged()
    }

    pub fn is_obj(&self) -> bool {
        (self.0 & (QNAN | SIGN_BIT)) == (QNAN | SIGN_BIT)
    }

    pub fn as_number(&self) -> Option<f64> {
        self.is_number().then(|| f64::from_bits(self.0))
    }

    pub fn as_bool(&self) -> Option<bool> {
        if self.0 == (QNAN | TAG_TRUE) {
            Some(true)
        } else if self.0 == (QNAN | TAG_FALSE) {
            Some(false)
        } else {
            None
        }
    }

    pub fn as_obj(&self) -> Option<Obj> {
        if !self.is_obj() {
            return None;
        }
        let ptr = (self.0 & !(SIGN_BIT | QNAN)) as *mut ObjHeader;
        let ptr = NonNull::new(ptr)?;
        // SAFETY: only ever constructed from `Obj::header_ptr` in `obj()`.
        Some(unsafe { Obj::from_header(ptr) })
    }

    pub fn is_falsey(&self) -> bool {
        self.is_nil() || self.as_bool() == Some(false)
    }

    pub fn type_name(&self) -> &'static str {
        if self.is_nil() {
            "nil"
        } else if self.is_bool() {
            "boolean"
        } else if self.is_number() {
            "number"
        } else {
            match self.as_obj() {
                Some(Obj::Str(_)) => "string",
                _ => "function",
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.is_number() && other.is_number() {
            return self.as_number() == other.as_number();
        }
        self.0 == other.0
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Value({})", self)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_nil() {
            write!(f, "nil")
        } else if let Some(b) = self.as_bool() {
            write!(f, "{b}")
        } else if let Some(n) = self.as_number() {
            write!(f, "{}", super::format_number(n))
        } else if let Some(o) = self.as_obj() {
            write!(f, "{o}")
        } else {
            unreachable!("every Value is nil, bool, number, or obj")
        }
    }
}
