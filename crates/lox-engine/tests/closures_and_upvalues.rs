//! Closure/upvalue behavior: sharing through an open upvalue while the
//! capturing frame is still live, and correct values surviving after
//! that frame returns (the upvalue having closed over them).

use lox_engine::vm::InterpretOutcome;
use lox_engine::Vm;

fn run(source: &str) -> String {
    let mut output = Vec::new();
    let mut vm = Vm::with_stdout(&mut output);
    match vm.interpret(source) {
        InterpretOutcome::Ok => {}
        other => panic!("expected program to run to completion, got {other:?}"),
    }
    String::from_utf8(output).expect("program output is valid UTF-8")
}

#[test]
fn open_upvalue_sees_writes_made_after_the_closure_was_created() {
    let source = r#"
        fun outer() {
            var x = "before";
            fun inner() { return x; }
            x = "after";
            return inner();
        }
        print outer();
    "#;
    assert_eq!(run(source), "after\n");
}

#[test]
fn closed_upvalue_keeps_its_value_after_the_owning_frame_returns() {
    let source = r#"
        fun outer() {
            var x = "captured";
            fun inner() { return x; }
            return inner;
        }
        var get = outer();
        print get();
    "#;
    assert_eq!(run(source), "captured\n");
}

#[test]
fn sibling_closures_over_the_same_local_share_one_upvalue() {
    let source = r#"
        fun outer() {
            var count = 0;
            fun increment() { count = count + 1; }
            fun read() { return count; }
            increment();
            increment();
            return read();
        }
        print outer();
    "#;
    assert_eq!(run(source), "2\n");
}

#[test]
fn nested_two_level_closures_capture_through_an_intermediate_scope() {
    let source = r#"
        fun a() {
            var x = "outer";
            fun b() {
                fun c() { return x; }
                return c();
            }
            return b();
        }
        print a();
    "#;
    assert_eq!(run(source), "outer\n");
}

#[test]
fn recursive_function_can_reference_itself_by_name() {
    let source = r#"
        fun countdown(n) {
            if (n <= 0) { print "done"; return; }
            print n;
            countdown(n - 1);
        }
        countdown(2);
    "#;
    assert_eq!(run(source), "2\n1\ndone\n");
}
