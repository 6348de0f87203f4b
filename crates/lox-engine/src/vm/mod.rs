//! The bytecode virtual machine: the component that ties the scanner,
//! compiler, object model, and garbage collector together and actually
//! runs a program.
//!
//! Grounded on `examples/original_source/c/source/vm.c`/`vm.h` for the
//! low-level shape (value stack, call frames, globals table), generalized
//! from that early arithmetic-only snapshot to the full closures-and-calls
//! machine. The re-entrant frame-array dispatch loop (rather than
//! recursing through Rust's own call stack on every Lox call) follows
//! `raya-engine`'s `vm::interpreter` structure.

mod error;
mod frame;
mod natives;

pub use error::{InterpretOutcome, RuntimeError, TraceFrame};
pub use frame::{CallFrame, FRAMES_MAX};

use std::io::{self, Write};

use crate::chunk::Opcode;
use crate::gc::{GarbageCollector, GcRef, Heap, ObjKind};
use crate::object::{self, Obj, ObjClosure, ObjNative, ObjString, ObjUpvalue, UpvalueState};
use crate::table::Table;
use crate::value::Value;

/// Binary operators whose operands must both be numbers. Grouped into one
/// helper so the five near-identical cases (`-`, `*`, `/`, `>`, `<`) share
/// their operand-type check and error instead of repeating it five times.
enum NumericOp {
    Subtract,
    Multiply,
    Divide,
    Greater,
    Less,
}

/// Whether execution should keep running or unwind with a result.
enum Flow {
    Continue,
    Done(InterpretOutcome),
}

/// The virtual machine: persistent across REPL lines, so the heap, the
/// globals table, and the string-intern table all outlive any single
/// `interpret` call.
///
/// Generic over where `print` writes so tests can capture output in a
/// `Vec<u8>` instead of going through real stdout.
pub struct Vm<W: Write = io::Stdout> {
    stack: Vec<Value>,
    frames: Vec<CallFrame>,
    globals: Table<Value>,
    strings: Table<()>,
    heap: Heap,
    gc: GarbageCollector,
    open_upvalues: Vec<GcRef<ObjUpvalue>>,
    stdout: W,
}

impl Vm<io::Stdout> {
    pub fn new() -> Self {
        Self::with_stdout(io::stdout())
    }
}

impl Default for Vm<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Vm<W> {
    /// Build a VM that writes `print` output to `stdout` instead of the
    /// real process stdout.
    pub fn with_stdout(stdout: W) -> Self {
        let mut vm = Self {
            stack: Vec::new(),
            frames: Vec::new(),
            globals: Table::new(),
            strings: Table::new(),
            heap: Heap::new(),
            gc: GarbageCollector::new(),
            open_upvalues: Vec::new(),
            stdout,
        };
        vm.define_native("clock", natives::clock);
        vm
    }

    fn define_native(&mut self, name: &str, function: object::NativeFn) {
        let name_ref = object::intern(&mut self.heap, &mut self.strings, name);
        let native = self.heap.alloc(ObjKind::Native, ObjNative::new(function));
        self.globals.set(name_ref, Value::obj(Obj::Native(native)));
    }

    /// Compile and run `source` to completion, returning what happened.
    pub fn interpret(&mut self, source: &str) -> InterpretOutcome {
        let function = match crate::compiler::compile(source, &mut self.heap, &mut self.strings) {
            Ok(function) => function,
            Err(errors) => return InterpretOutcome::CompileError(errors),
        };

        self.push(Value::obj(Obj::Function(function)));
        let closure = self.heap.alloc(ObjKind::Closure, ObjClosure::new(function, Vec::new()));
        self.pop();
        self.push(Value::obj(Obj::Closure(closure)));
        self.frames.push(CallFrame {
            closure,
            ip: 0,
            slots_base: 0,
        });

        self.run()
    }

    // -- stack helpers ---------------------------------------------------

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Value {
        self.stack.pop().expect("value stack underflow")
    }

    fn peek(&self, distance: usize) -> Value {
        self.stack[self.stack.len() - 1 - distance]
    }

    fn reset_stack(&mut self) {
        self.stack.clear();
        self.frames.clear();
        self.open_upvalues.clear();
    }

    // -- bytecode reading --------------------------------------------------

    fn frame(&self) -> &CallFrame {
        self.frames.last().expect("call frame stack non-empty")
    }

    fn read_byte(&mut self) -> u8 {
        let frame = self.frames.last_mut().expect("call frame stack non-empty");
        let byte = frame.closure.function.chunk.code[frame.ip];
        frame.ip += 1;
        byte
    }

    fn read_u16(&mut self) -> u16 {
        let hi = self.read_byte() as u16;
        let lo = self.read_byte() as u16;
        (hi << 8) | lo
    }

    fn read_constant(&mut self) -> Value {
        let index = self.read_byte() as usize;
        self.frame().closure.function.chunk.constants[index]
    }

    fn read_constant_string(&mut self) -> GcRef<ObjString> {
        match self.read_constant().as_obj() {
            Some(Obj::Str(s)) => s,
            _ => unreachable!("compiler only ever emits string constants for names"),
        }
    }

    // -- garbage collection ------------------------------------------------

    fn maybe_collect(&mut self) {
        if cfg!(feature = "stress-gc") || self.gc.should_collect(&self.heap) {
            self.collect_garbage();
        }
    }

    fn collect_garbage(&mut self) {
        for value in self.stack.iter() {
            self.gc.mark_value(*value);
        }
        for frame in self.frames.iter() {
            self.gc.mark_object(frame.closure.header_ptr());
        }
        for upvalue in self.open_upvalues.iter() {
            self.gc.mark_object(upvalue.header_ptr());
        }
        for (key, value) in self.globals.iter() {
            self.gc.mark_object(key.header_ptr());
            self.gc.mark_value(*value);
        }
        self.gc.trace();
        // Weak intern sweep must run after tracing but before the heap
        // sweep, so the table never holds a pointer to freed memory.
        self.strings.retain_marked_keys();
        self.gc.sweep(&mut self.heap);
    }

    fn alloc_string(&mut self, text: &str) -> GcRef<ObjString> {
        self.maybe_collect();
        object::intern(&mut self.heap, &mut self.strings, text)
    }

    // -- upvalues ------------------------------------------------------

    /// Find an already-open upvalue for `stack_index`, or create one.
    /// `open_upvalues` is kept sorted by descending stack index so
    /// [`Vm::close_upvalues`] can close a contiguous prefix.
    fn capture_upvalue(&mut self, stack_index: usize) -> GcRef<ObjUpvalue> {
        let mut insert_at = self.open_upvalues.len();
        for (i, upvalue) in self.open_upvalues.iter().enumerate() {
            match upvalue.stack_index() {
                Some(idx) if idx == stack_index => return *upvalue,
                Some(idx) if idx < stack_index => {
                    insert_at = i;
                    break;
                }
                _ => {}
            }
        }
        self.maybe_collect();
        let created = self
            .heap
            .alloc(ObjKind::Upvalue, ObjUpvalue::new_open(stack_index));
        self.open_upvalues.insert(insert_at, created);
        created
    }

    /// Close every open upvalue pointing at or above `threshold`, copying
    /// its value out of the stack before the frame that owns that slot
    /// goes away.
    fn close_upvalues(&mut self, threshold: usize) {
        while let Some(&upvalue) = self.open_upvalues.first() {
            match upvalue.stack_index() {
                Some(idx) if idx >= threshold => {
                    upvalue.close(self.stack[idx]);
                    self.open_upvalues.remove(0);
                }
                _ => break,
            }
        }
    }

    // -- calls -----------------------------------------------------------

    fn call_value(&mut self, argc: usize) -> Option<InterpretOutcome> {
        match self.peek(argc).as_obj() {
            Some(Obj::Closure(closure)) => self.call_closure(closure, argc),
            Some(Obj::Native(native)) => self.call_native(native, argc),
            _ => Some(self.runtime_error(RuntimeError::NotCallable)),
        }
    }

    fn call_closure(&mut self, closure: GcRef<ObjClosure>, argc: usize) -> Option<InterpretOutcome> {
        let arity = closure.function.arity;
        if argc != arity as usize {
            return Some(self.runtime_error(RuntimeError::ArityMismatch {
                expected: arity,
                got: argc as u8,
            }));
        }
        if self.frames.len() >= FRAMES_MAX {
            return Some(self.runtime_error(RuntimeError::StackOverflow));
        }
        let slots_base = self.stack.len() - argc - 1;
        self.frames.push(CallFrame {
            closure,
            ip: 0,
            slots_base,
        });
        None
    }

    fn call_native(&mut self, native: GcRef<ObjNative>, argc: usize) -> Option<InterpretOutcome> {
        // Natives take whatever argument count the call site passed, with
        // no arity check — matching clox, which calls straight through to
        // the function pointer regardless of `argCount`.
        let args_start = self.stack.len() - argc;
        let args: Vec<Value> = self.stack[args_start..].to_vec();
        let result = (native.function)(&args);
        self.stack.truncate(args_start - 1);
        self.push(result);
        None
    }

    // -- errors ------------------------------------------------------------

    fn runtime_error(&mut self, error: RuntimeError) -> InterpretOutcome {
        let trace = self
            .frames
            .iter()
            .rev()
            .map(|frame| {
                let function = frame.closure.function;
                TraceFrame {
                    line: function.chunk.line_at(frame.ip - 1),
                    name: function.display_name(),
                }
            })
            .collect();
        self.reset_stack();
        InterpretOutcome::RuntimeError { error, trace }
    }

    // -- the dispatch loop -------------------------------------------------

    fn run(&mut self) -> InterpretOutcome {
        loop {
            let instruction = Opcode::from_u8(self.read_byte());
            match self.execute(instruction) {
                Flow::Continue => {}
                Flow::Done(outcome) => return outcome,
            }
        }
    }

    fn execute(&mut self, instruction: Opcode) -> Flow {
        match instruction {
            Opcode::Constant => {
                let value = self.read_constant();
                self.push(value);
            }
            Opcode::Nil => self.push(Value::nil()),
            Opcode::True => self.push(Value::boolean(true)),
            Opcode::False => self.push(Value::boolean(false)),
            Opcode::Pop => {
                self.pop();
            }
            Opcode::GetLocal => {
                let slot = self.read_byte() as usize;
                let base = self.frame().slots_base;
                let value = self.stack[base + slot];
                self.push(value);
            }
            Opcode::SetLocal => {
                let slot = self.read_byte() as usize;
                let base = self.frame().slots_base;
                self.stack[base + slot] = self.peek(0);
            }
            Opcode::GetGlobal => {
                let name = self.read_constant_string();
                match self.globals.get(name) {
                    Some(&value) => self.push(value),
                    None => {
                        return Flow::Done(self.runtime_error(RuntimeError::UndefinedVariable(
                            name.as_str().to_string(),
                        )))
                    }
                }
            }
            Opcode::DefineGlobal => {
                let name = self.read_constant_string();
                let value = self.pop();
                self.globals.set(name, value);
            }
            Opcode::SetGlobal => {
                let name = self.read_constant_string();
                let value = self.peek(0);
                if self.globals.set(name, value) {
                    self.globals.delete(name);
                    return Flow::Done(self.runtime_error(RuntimeError::UndefinedVariable(
                        name.as_str().to_string(),
                    )));
                }
            }
            Opcode::GetUpvalue => {
                let slot = self.read_byte() as usize;
                let upvalue = self.frame().closure.upvalues[slot];
                let value = match upvalue.state() {
                    UpvalueState::Open(idx) => self.stack[idx],
                    UpvalueState::Closed(value) => value,
                };
                self.push(value);
            }
            Opcode::SetUpvalue => {
                let slot = self.read_byte() as usize;
                let upvalue = self.frame().closure.upvalues[slot];
                let value = self.peek(0);
                match upvalue.state() {
                    UpvalueState::Open(idx) => self.stack[idx] = value,
                    UpvalueState::Closed(_) => upvalue.close(value),
                }
            }
            Opcode::Equal => {
                let b = self.pop();
                let a = self.pop();
                self.push(Value::boolean(a == b));
            }
            Opcode::Greater => {
                if let Some(outcome) = self.numeric_binary(NumericOp::Greater) {
                    return Flow::Done(outcome);
                }
            }
            Opcode::Less => {
                if let Some(outcome) = self.numeric_binary(NumericOp::Less) {
                    return Flow::Done(outcome);
                }
            }
            Opcode::Add => {
                if let Some(outcome) = self.add() {
                    return Flow::Done(outcome);
                }
            }
            Opcode::Subtract => {
                if let Some(outcome) = self.numeric_binary(NumericOp::Subtract) {
                    return Flow::Done(outcome);
                }
            }
            Opcode::Multiply => {
                if let Some(outcome) = self.numeric_binary(NumericOp::Multiply) {
                    return Flow::Done(outcome);
                }
            }
            Opcode::Divide => {
                if let Some(outcome) = self.numeric_binary(NumericOp::Divide) {
                    return Flow::Done(outcome);
                }
            }
            Opcode::Not => {
                let value = self.pop();
                self.push(Value::boolean(value.is_falsey()));
            }
            Opcode::Negate => match self.peek(0).as_number() {
                Some(n) => {
                    self.pop();
                    self.push(Value::number(-n));
                }
                None => return Flow::Done(self.runtime_error(RuntimeError::OperandMustBeNumber)),
            },
            Opcode::Print => {
                let value = self.pop();
                let _ = writeln!(self.stdout, "{value}");
            }
            Opcode::Jump => {
                let offset = self.read_u16();
                self.frames.last_mut().unwrap().ip += offset as usize;
            }
            Opcode::JumpIfFalse => {
                let offset = self.read_u16();
                if self.peek(0).is_falsey() {
                    self.frames.last_mut().unwrap().ip += offset as usize;
                }
            }
            Opcode::Loop => {
                let offset = self.read_u16();
                self.frames.last_mut().unwrap().ip -= offset as usize;
            }
            Opcode::Call => {
                let argc = self.read_byte() as usize;
                if let Some(outcome) = self.call_value(argc) {
                    return Flow::Done(outcome);
                }
            }
            Opcode::Closure => self.closure(),
            Opcode::CloseUpvalue => {
                let top = self.stack.len() - 1;
                self.close_upvalues(top);
                self.pop();
            }
            Opcode::Return => {
                let result = self.pop();
                let slots_base = self.frame().slots_base;
                self.close_upvalues(slots_base);
                self.frames.pop();
                if self.frames.is_empty() {
                    self.pop();
                    return Flow::Done(InterpretOutcome::Ok);
                }
                self.stack.truncate(slots_base);
                self.push(result);
            }
        }
        Flow::Continue
    }

    fn numeric_binary(&mut self, op: NumericOp) -> Option<InterpretOutcome> {
        let (a, b) = match (self.peek(1).as_number(), self.peek(0).as_number()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Some(self.runtime_error(RuntimeError::OperandsMustBeNumbers)),
        };
        self.pop();
        self.pop();
        let result = match op {
            NumericOp::Subtract => Value::number(a - b),
            NumericOp::Multiply => Value::number(a * b),
            NumericOp::Divide => Value::number(a / b),
            NumericOp::Greater => Value::boolean(a > b),
            NumericOp::Less => Value::boolean(a < b),
        };
        self.push(result);
        None
    }

    fn add(&mut self) -> Option<InterpretOutcome> {
        let b = self.peek(0);
        let a = self.peek(1);
        if let (Some(a), Some(b)) = (a.as_number(), b.as_number()) {
            self.pop();
            self.pop();
            self.push(Value::number(a + b));
            return None;
        }
        if let (Some(Obj::Str(a)), Some(Obj::Str(b))) = (a.as_obj(), b.as_obj()) {
            let concatenated = format!("{}{}", a.as_str(), b.as_str());
            self.pop();
            self.pop();
            let interned = self.alloc_string(&concatenated);
            self.push(Value::obj(Obj::Str(interned)));
            return None;
        }
        Some(self.runtime_error(RuntimeError::OperandsMustBeNumbersOrStrings))
    }

    fn closure(&mut self) {
        let function = match self.read_constant().as_obj() {
            Some(Obj::Function(f)) => f,
            _ => unreachable!("OP_CLOSURE's constant is always a function"),
        };
        let upvalue_count = function.upvalue_count as usize;
        let slots_base = self.frame().slots_base;
        let enclosing = self.frame().closure;

        let mut upvalues = Vec::with_capacity(upvalue_count);
        for _ in 0..upvalue_count {
            let is_local = self.read_byte() != 0;
            let index = self.read_byte() as usize;
            let upvalue = if is_local {
                self.capture_upvalue(slots_base + index)
            } else {
                enclosing.upvalues[index]
            };
            upvalues.push(upvalue);
        }

        self.maybe_collect();
        let closure = self.heap.alloc(ObjKind::Closure, ObjClosure::new(function, upvalues));
        self.push(Value::obj(Obj::Closure(closure)));
    }
}
