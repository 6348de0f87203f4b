//! Upvalues: the mechanism closures use to capture variables that outlive
//! the stack frame that declared them.
//!
//! An upvalue starts "open", pointing at a live stack slot, so that two
//! closures capturing the same local see each other's writes while the
//! frame is still on the stack. When the frame returns, the VM "closes"
//! every upvalue pointing into it by copying the value out of the stack
//! and into the upvalue itself, per `examples/original_source/c/source/vm.c`'s
//! `closeUpvalues`.

use std::cell::Cell;

use crate::value::Value;

#[derive(Debug, Clone, Copy)]
pub enum UpvalueState {
    /// Still pointing at `stack[index]`.
    Open(usize),
    /// Detached from the stack, owning its value directly.
    Closed(Value),
}

#[derive(Debug)]
pub struct ObjUpvalue {
    state: Cell<UpvalueState>,
}

impl ObjUpvalue {
    pub fn new_open(stack_index: usize) -> Self {
        Self {
            state: Cell::new(UpvalueState::Open(stack_index)),
        }
    }

    pub fn state(&self) -> UpvalueState {
        self.state.get()
    }

    pub fn stack_index(&self) -> Option<usize> {
        match self.state.get() {
            UpvalueState::Open(idx) => Some(idx),
            UpvalueState::Closed(_) => None,
        }
    }

    pub fn close(&self, value: Value) {
        self.state.set(UpvalueState::Closed(value));
    }
}
