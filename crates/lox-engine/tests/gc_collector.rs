//! Direct tests of the mark-sweep collector (`lox_engine::gc`) against
//! heap-allocated objects, independent of the VM: after any collection,
//! every object reachable from the root set survives and every
//! unreachable one is freed.

use lox_engine::gc::{GarbageCollector, GcBox, Heap, ObjKind};
use lox_engine::object::ObjString;

fn string_size() -> usize {
    std::mem::size_of::<GcBox<ObjString>>()
}

#[test]
fn unreached_objects_are_freed_and_reached_ones_survive() {
    let mut heap = Heap::new();
    let mut gc = GarbageCollector::new();

    let kept = heap.alloc(ObjKind::Str, ObjString::new("kept"));
    let _dropped = heap.alloc(ObjKind::Str, ObjString::new("dropped"));

    let before = heap.bytes_allocated();
    assert_eq!(before, string_size() * 2);

    // Only `kept` is reachable from this "root set".
    gc.mark_object(kept.header_ptr());
    gc.collect(&mut heap);

    assert_eq!(heap.bytes_allocated(), string_size());
}

#[test]
fn marking_an_object_twice_does_not_double_count_it_in_the_gray_worklist() {
    let mut heap = Heap::new();
    let mut gc = GarbageCollector::new();
    let kept = heap.alloc(ObjKind::Str, ObjString::new("kept"));

    gc.mark_object(kept.header_ptr());
    gc.mark_object(kept.header_ptr());
    gc.trace();
    gc.sweep(&mut heap);

    assert_eq!(heap.bytes_allocated(), string_size());
}

#[test]
fn marks_are_cleared_on_survivors_after_a_collection() {
    let mut heap = Heap::new();
    let mut gc = GarbageCollector::new();
    let kept = heap.alloc(ObjKind::Str, ObjString::new("kept"));

    gc.mark_object(kept.header_ptr());
    gc.collect(&mut heap);

    assert!(!kept.header().is_marked());
}

#[test]
fn collecting_with_no_roots_frees_everything() {
    let mut heap = Heap::new();
    let mut gc = GarbageCollector::new();
    heap.alloc(ObjKind::Str, ObjString::new("a"));
    heap.alloc(ObjKind::Str, ObjString::new("b"));
    heap.alloc(ObjKind::Str, ObjString::new("c"));

    assert_eq!(heap.bytes_allocated(), string_size() * 3);
    gc.collect(&mut heap);
    assert_eq!(heap.bytes_allocated(), 0);
}
