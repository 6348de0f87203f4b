//! Tri-color mark-and-sweep collector.
//!
//! Follows `examples/original_source/c/source/memory.c`'s `collectGarbage`
//! pipeline (mark roots, trace references, sweep the intern table, sweep
//! the object list, adjust the threshold) and `raya-engine`'s
//! `vm::gc::collector` split between "the VM marks its own roots" and
//! "the collector traces and sweeps" — the collector itself has no idea
//! what a stack frame or a global is, only how to blacken an already-gray
//! object and reclaim unmarked ones.

use std::ptr::NonNull;

use crate::object::{ObjClosure, ObjFunction, ObjUpvalue, UpvalueState};
use crate::value::Value;

use super::header::{GcRef, ObjHeader, ObjKind};
use super::heap::Heap;

const INITIAL_THRESHOLD: usize = 1024 * 1024;
const GROW_FACTOR: usize = 2;

/// Drives marking and sweeping. Owns the gray worklist and the
/// next-collection threshold; the `Heap` itself stays a dumb allocator.
pub struct GarbageCollector {
    gray: Vec<NonNull<ObjHeader>>,
    threshold: usize,
}

impl GarbageCollector {
    pub fn new() -> Self {
        Self {
            gray: Vec::new(),
            threshold: INITIAL_THRESHOLD,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether the heap has grown enough since the last collection to
    /// warrant another one.
    pub fn should_collect(&self, heap: &Heap) -> bool {
        heap.bytes_allocated() > self.threshold
    }

    /// Mark a value's referent (a no-op for non-object values).
    pub fn mark_value(&mut self, value: Value) {
        if let Some(obj) = value.as_obj() {
            self.mark_object(obj.header_ptr());
        }
    }

    /// Mark an object reachable. Idempotent: already-marked objects are
    /// not re-pushed onto the gray worklist.
    pub fn mark_object(&mut self, ptr: NonNull<ObjHeader>) {
        let header = unsafe { ptr.as_ref() };
        if header.is_marked() {
            return;
        }
        header.mark();
        self.gray.push(ptr);
    }

    /// Drain the gray worklist, marking every object each gray object
    /// refers to until nothing gray remains.
    pub fn trace(&mut self) {
        while let Some(ptr) = self.gray.pop() {
            self.blacken(ptr);
        }
    }

    /// Mark the direct children of one object, dispatching on its kind.
    fn blacken(&mut self, ptr: NonNull<ObjHeader>) {
        let kind = unsafe { ptr.as_ref().kind };
        match kind {
            ObjKind::Str | ObjKind::Native => {}
            ObjKind::Function => {
                let r: GcRef<ObjFunction> = unsafe { GcRef::new(ptr.cast()) };
                if let Some(name) = r.name {
                    self.mark_object(name.header_ptr());
                }
                for constant in &r.chunk.constants {
                    self.mark_value(*constant);
                }
            }
            ObjKind::Closure => {
                let r: GcRef<ObjClosure> = unsafe { GcRef::new(ptr.cast()) };
                self.mark_object(r.function.header_ptr());
                for upvalue in &r.upvalues {
                    self.mark_object(upvalue.header_ptr());
                }
            }
            ObjKind::Upvalue => {
                let r: GcRef<ObjUpvalue> = unsafe { GcRef::new(ptr.cast()) };
                if let UpvalueState::Closed(value) = r.state() {
                    self.mark_value(value);
                }
            }
        }
    }

    /// Walk the heap's intrusive all-objects list, freeing anything left
    /// unmarked and clearing the mark bit on everything that survives.
    ///
    /// Must run only after [`GarbageCollector::trace`] has finished, and
    /// after the caller has already dropped any weak references to dead
    /// objects (see the intern table's own sweep step).
    pub fn sweep(&mut self, heap: &mut Heap) {
        let mut freed = 0usize;
        let mut previous: Option<NonNull<ObjHeader>> = None;
        let mut current = heap.head();

        while let Some(ptr) = current {
            let header = unsafe { ptr.as_ref() };
            let next = header.next();

            if header.is_marked() {
                header.unmark();
                previous = Some(ptr);
            } else {
                freed += unsafe { free_object(ptr) };
                match previous {
                    Some(prev) => unsafe { prev.as_ref().set_next(next) },
                    None => heap.set_head(next),
                }
            }

            current = next;
        }

        heap.record_freed(freed);
        self.threshold = heap.bytes_allocated() * GROW_FACTOR;
    }

    /// Run a full collection cycle: trace from whatever roots the caller
    /// has already marked, then sweep. Returns bytes reclaimed.
    pub fn collect(&mut self, heap: &mut Heap) -> usize {
        self.trace();
        let before = heap.bytes_allocated();
        self.sweep(heap);
        before - heap.bytes_allocated()
    }
}

impl Default for GarbageCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Reconstruct the owning `Box<GcBox<T>>` for a dead object and drop it,
/// returning its size in bytes.
unsafe fn free_object(ptr: NonNull<ObjHeader>) -> usize {
    use crate::object::{ObjNative, ObjString};

    let kind = ptr.as_ref().kind;
    match kind {
        ObjKind::Str => drop_box::<ObjString>(ptr),
        ObjKind::Function => drop_box::<ObjFunction>(ptr),
        ObjKind::Native => drop_box::<ObjNative>(ptr),
        ObjKind::Closure => drop_box::<ObjClosure>(ptr),
        ObjKind::Upvalue => drop_box::<ObjUpvalue>(ptr),
    }
}

unsafe fn drop_box<T>(ptr: NonNull<ObjHeader>) -> usize {
    use super::header::GcBox;
    let typed: NonNull<GcBox<T>> = ptr.cast();
    let size = std::mem::size_of::<GcBox<T>>();
    drop(Box::from_raw(typed.as_ptr()));
    size
}
