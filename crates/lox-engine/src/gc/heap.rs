//! Heap allocator: the single chokepoint every heap object passes through.
//!
//! Mirrors the role of `raya-engine`'s `vm::gc::heap::Heap` and of clox's
//! `reallocate` (`examples/original_source/c/source/memory.c`): every
//! allocation is tracked here so the collector knows `bytes_allocated`
//! and can walk every live object for sweep via the intrusive header
//! list, without a separate `Vec` of allocations to keep in sync.

use super::header::{GcBox, GcRef, ObjHeader, ObjKind};
use std::ptr::NonNull;

/// Allocator + intrusive all-objects list (`vm.objects` in spec terms).
pub struct Heap {
    head: Option<NonNull<ObjHeader>>,
    bytes_allocated: usize,
}

impl Heap {
    pub fn new() -> Self {
        Self {
            head: None,
            bytes_allocated: 0,
        }
    }

    pub fn bytes_allocated(&self) -> usize {
        self.bytes_allocated
    }

    /// Allocate `value` on the heap, splice it onto the head of the
    /// all-objects list, and return a handle to it.
    pub fn alloc<T>(&mut self, kind: ObjKind, value: T) -> GcRef<T> {
        let boxed = Box::new(GcBox::new(kind, value));
        let size = std::mem::size_of_val(&*boxed);
        let raw = Box::into_raw(boxed);
        let ptr = unsafe { NonNull::new_unchecked(raw) };

        unsafe {
            ptr.as_ref().header.set_next(self.head);
        }
        self.head = Some(ptr.cast());
        self.bytes_allocated += size;

        unsafe { GcRef::new(ptr) }
    }

    /// Head of the intrusive all-objects list, for the sweeper.
    pub fn head(&self) -> Option<NonNull<ObjHeader>> {
        self.head
    }

    pub fn set_head(&mut self, head: Option<NonNull<ObjHeader>>) {
        self.head = head;
    }

    /// Record bytes freed during sweep.
    pub fn record_freed(&mut self, bytes: usize) {
        self.bytes_allocated = self.bytes_allocated.saturating_sub(bytes);
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
