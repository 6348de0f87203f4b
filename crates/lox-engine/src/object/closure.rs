//! Closures: a function paired with the upvalues its body captured.
//!
//! Every call goes through a closure, even for functions that capture
//! nothing — matching clox, where `OP_CLOSURE` always wraps the compiled
//! `ObjFunction` before it becomes callable.

use crate::gc::GcRef;

use super::{ObjFunction, ObjUpvalue};

#[derive(Debug)]
pub struct ObjClosure {
    pub function: GcRef<ObjFunction>,
    pub upvalues: Vec<GcRef<ObjUpvalue>>,
}

impl ObjClosure {
    pub fn new(function: GcRef<ObjFunction>, upvalues: Vec<GcRef<ObjUpvalue>>) -> Self {
        Self { function, upvalues }
    }
}
