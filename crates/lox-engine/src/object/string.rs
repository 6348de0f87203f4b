//! Interned string objects.
//!
//! Ported from `examples/original_source/c/source/object.c`'s `ObjString`:
//! an immutable byte buffer with its hash precomputed at construction time,
//! so every subsequent table lookup is a single `u32` comparison before it
//! ever touches the bytes.

use crate::gc::{GcRef, Heap, ObjKind};
use crate::table::Table;

/// FNV-1a, 32-bit, matching clox's `hashString`.
pub fn fnv1a_hash(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 2166136261;
    for &byte in bytes {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}

/// Find-or-allocate: the one path every interned string goes through,
/// whether it's being produced by the compiler (identifiers, literals) or
/// the VM (`+` on two strings).
pub fn intern(heap: &mut Heap, strings: &mut Table<()>, text: &str) -> GcRef<ObjString> {
    let hash = fnv1a_hash(text.as_bytes());
    if let Some(existing) = strings.find_string(text, hash) {
        return existing;
    }
    let interned = heap.alloc(ObjKind::Str, ObjString::new(text));
    strings.set(interned, ());
    interned
}

/// An interned, immutable Lox string.
#[derive(Debug)]
pub struct ObjString {
    chars: Box<str>,
    hash: u32,
}

impl ObjString {
    pub fn new(chars: impl Into<Box<str>>) -> Self {
        let chars = chars.into();
        let hash = fnv1a_hash(chars.as_bytes());
        Self { chars, hash }
    }

    pub fn as_str(&self) -> &str {
        &self.chars
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl std::fmt::Display for ObjString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.chars)
    }
}
