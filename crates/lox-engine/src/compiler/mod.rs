//! Single-pass compiler: a Pratt expression parser and a recursive-descent
//! statement parser that emit bytecode directly into a [`Chunk`] as they
//! go, with no separate AST stage.
//!
//! Ported from `examples/original_source/c/source/compile.c`. The biggest
//! structural departure from the C original is how nested function
//! compilation state is threaded: clox keeps a `Compiler*` linked list via
//! a raw `enclosing` pointer; here every in-progress function is a
//! [`FunctionScope`] on a plain `Vec` stack, and `resolve_upvalue` walks
//! that stack by index instead of following pointers. This sidesteps
//! self-referential-struct issues while keeping exactly the same
//! resolution algorithm (recurse into the enclosing scope, capture either
//! a local or an upvalue one level further out).

mod error;

pub use error::{AtContext, CompileError};

use crate::chunk::{Chunk, Opcode};
use crate::gc::{GcRef, Heap, ObjKind};
use crate::object::{Obj, ObjFunction, ObjString};
use crate::scanner::{Scanner, Token, TokenKind};
use crate::table::Table;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call | Precedence::Primary => Precedence::Primary,
        }
    }
}

fn infix_precedence(kind: TokenKind) -> Precedence {
    use TokenKind::*;
    match kind {
        Minus | Plus => Precedence::Term,
        Slash | Star => Precedence::Factor,
        BangEqual | EqualEqual => Precedence::Equality,
        Greater | GreaterEqual | Less | LessEqual => Precedence::Comparison,
        And => Precedence::And,
        Or => Precedence::Or,
        LeftParen => Precedence::Call,
        _ => Precedence::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    Script,
    Function,
}

struct Local<'src> {
    name: &'src str,
    depth: i32,
    is_captured: bool,
}

#[derive(Clone, Copy)]
struct UpvalueDesc {
    index: u8,
    is_local: bool,
}

struct FunctionScope<'src> {
    function: ObjFunction,
    fn_type: FunctionType,
    locals: Vec<Local<'src>>,
    upvalues: Vec<UpvalueDesc>,
    scope_depth: i32,
}

impl<'src> FunctionScope<'src> {
    fn new(fn_type: FunctionType, name: Option<GcRef<ObjString>>) -> Self {
        // Slot 0 is reserved for the closure being called; it has no
        // name a user program could ever reference.
        let reserved = Local {
            name: "",
            depth: 0,
            is_captured: false,
        };
        Self {
            function: ObjFunction::new(name),
            fn_type,
            locals: vec![reserved],
            upvalues: Vec::new(),
            scope_depth: 0,
        }
    }
}

/// Single-pass parser/compiler over one source file.
struct Parser<'src, 'a> {
    scanner: Scanner<'src>,
    previous: Token<'src>,
    current: Token<'src>,
    had_error: bool,
    panic_mode: bool,
    errors: Vec<CompileError>,
    scopes: Vec<FunctionScope<'src>>,
    heap: &'a mut Heap,
    strings: &'a mut Table<()>,
}

/// Compile `source` into the implicit top-level script function.
///
/// On success returns the script function, already heap-allocated. On
/// failure returns every diagnostic collected via panic-mode recovery,
/// not just the first.
pub fn compile(
    source: &str,
    heap: &mut Heap,
    strings: &mut Table<()>,
) -> Result<GcRef<ObjFunction>, Vec<CompileError>> {
    let mut parser = Parser::new(source, heap, strings);
    while !parser.match_token(TokenKind::Eof) {
        parser.declaration();
    }
    let (function, had_error, errors) = parser.finish();
    if had_error {
        return Err(errors);
    }
    Ok(heap.alloc(ObjKind::Function, function))
}

impl<'src, 'a> Parser<'src, 'a> {
    fn new(source: &'src str, heap: &'a mut Heap, strings: &'a mut Table<()>) -> Self {
        let mut scanner = Scanner::new(source);
        let first = scanner.scan_token();
        Self {
            scanner,
            previous: first,
            current: first,
            had_error: false,
            panic_mode: false,
            errors: Vec::new(),
            scopes: vec![FunctionScope::new(FunctionType::Script, None)],
            heap,
            strings,
        }
    }

    fn finish(mut self) -> (ObjFunction, bool, Vec<CompileError>) {
        self.emit_return();
        let scope = self.scopes.pop().expect("script scope always present");
        (scope.function, self.had_error, self.errors)
    }

    // -- token stream -----------------------------------------------

    fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let message = self.current.lexeme.to_string();
            self.error_at_current(&message);
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.current.kind == kind {
            self.advance();
        } else {
            self.error_at_current(message);
        }
    }

    fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message);
    }

    fn error(&mut self, message: &str) {
        self.error_at(self.previous, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.had_error = true;
        let at = match token.kind {
            TokenKind::Eof => Some(AtContext::Eof),
            TokenKind::Error => None,
            _ => Some(AtContext::Lexeme(token.lexeme.to_string())),
        };
        self.errors.push(CompileError::new(token.line, at, message));
    }

    fn synchronize(&mut self) {
        self.panic_mode = false;
        while self.current.kind != TokenKind::Eof {
            if self.previous.kind == TokenKind::Semicolon {
                return;
            }
            use TokenKind::*;
            if matches!(
                self.current.kind,
                Class | Fun | Var | For | If | While | Print | Return
            ) {
                return;
            }
            self.advance();
        }
    }

    // -- bytecode emission --------------------------------------------

    fn current_chunk(&mut self) -> &mut Chunk {
        &mut self.scopes.last_mut().expect("scope stack non-empty").function.chunk
    }

    fn emit_byte(&mut self, byte: u8) {
        let line = self.previous.line;
        self.current_chunk().write_byte(byte, line);
    }

    fn emit_op(&mut self, op: Opcode) {
        self.emit_byte(op as u8);
    }

    fn emit_bytes(&mut self, op: u8, operand: u8) {
        self.emit_byte(op);
        self.emit_byte(operand);
    }

    fn emit_return(&mut self) {
        self.emit_op(Opcode::Nil);
        self.emit_op(Opcode::Return);
    }

    fn make_constant(&mut self, value: Value) -> u8 {
        let index = self.current_chunk().add_constant(value);
        if index > u8::MAX as usize {
            self.error("Too many constants in one chunk.");
            return 0;
        }
        index as u8
    }

    fn emit_constant(&mut self, value: Value) {
        let constant = self.make_constant(value);
        self.emit_bytes(Opcode::Constant as u8, constant);
    }

    fn emit_jump(&mut self, op: Opcode) -> usize {
        self.emit_op(op);
        self.emit_byte(0xff);
        self.emit_byte(0xff);
        self.current_chunk().len() - 2
    }

    fn patch_jump(&mut self, offset: usize) {
        let jump = self.current_chunk().len() - offset - 2;
        if jump > u16::MAX as usize {
            self.error("Too much code to jump over.");
        }
        let chunk = self.current_chunk();
        chunk.code[offset] = ((jump >> 8) & 0xff) as u8;
        chunk.code[offset + 1] = (jump & 0xff) as u8;
    }

    fn emit_loop(&mut self, loop_start: usize) {
        self.emit_op(Opcode::Loop);
        let offset = self.current_chunk().len() - loop_start + 2;
        if offset > u16::MAX as usize {
            self.error("Loop body too large.");
        }
        self.emit_byte(((offset >> 8) & 0xff) as u8);
        self.emit_byte((offset & 0xff) as u8);
    }

    // -- string interning ----------------------------------------------

    fn intern_string(&mut self, text: &str) -> GcRef<ObjString> {
        crate::object::intern(self.heap, self.strings, text)
    }

    fn identifier_constant(&mut self, name: &str) -> u8 {
        let interned = self.intern_string(name);
        self.make_constant(Value::obj(Obj::Str(interned)))
    }

    // -- scope / variable resolution ------------------------------------

    fn scope_depth(&self) -> i32 {
        self.scopes.last().expect("scope stack non-empty").scope_depth
    }

    fn begin_scope(&mut self) {
        self.scopes.last_mut().expect("scope stack non-empty").scope_depth += 1;
    }

    fn end_scope(&mut self) {
        let scope = self.scopes.last_mut().expect("scope stack non-empty");
        scope.scope_depth -= 1;
        let depth = scope.scope_depth;

        let mut start = scope.locals.len();
        while start > 0 && scope.locals[start - 1].depth > depth {
            start -= 1;
        }
        let captured: Vec<bool> = scope.locals[start..].iter().map(|l| l.is_captured).collect();
        scope.locals.truncate(start);

        for is_captured in captured.into_iter().rev() {
            if is_captured {
                self.emit_op(Opcode::CloseUpvalue);
            } else {
                self.emit_op(Opcode::Pop);
            }
        }
    }

    fn add_local(&mut self, name: &'src str) {
        let scope = self.scopes.last_mut().expect("scope stack non-empty");
        if scope.locals.len() >= 256 {
            self.error("Too many local variables in function.");
            return;
        }
        scope.locals.push(Local {
            name,
            depth: -1,
            is_captured: false,
        });
    }

    fn declare_variable(&mut self) {
        if self.scope_depth() == 0 {
            return;
        }
        let name = self.previous.lexeme;
        let scope = self.scopes.last().expect("scope stack non-empty");
        let depth = scope.scope_depth;
        let mut duplicate = false;
        for local in scope.locals.iter().rev() {
            if local.depth != -1 && local.depth < depth {
                break;
            }
            if local.name == name {
                duplicate = true;
                break;
            }
        }
        if duplicate {
            self.error("Already a variable with this name in this scope.");
            return;
        }
        self.add_local(name);
    }

    fn parse_variable(&mut self, message: &str) -> u8 {
        self.consume(TokenKind::Identifier, message);
        self.declare_variable();
        if self.scope_depth() > 0 {
            return 0;
        }
        self.identifier_constant(self.previous.lexeme)
    }

    fn mark_initialized(&mut self) {
        if self.scope_depth() == 0 {
            return;
        }
        let scope = self.scopes.last_mut().expect("scope stack non-empty");
        let depth = scope.scope_depth;
        scope.locals.last_mut().expect("local just declared").depth = depth;
    }

    fn define_variable(&mut self, global: u8) {
        if self.scope_depth() > 0 {
            self.mark_initialized();
            return;
        }
        self.emit_bytes(Opcode::DefineGlobal as u8, global);
    }

    fn resolve_local(&mut self, scope_idx: usize, name: &str) -> Option<u8> {
        let scope = &self.scopes[scope_idx];
        for (i, local) in scope.locals.iter().enumerate().rev() {
            if local.name == name {
                if local.depth == -1 {
                    self.error("Can't read local variable in its own initializer.");
                }
                return Some(i as u8);
            }
        }
        None
    }

    fn resolve_upvalue(&mut self, scope_idx: usize, name: &str) -> Option<u8> {
        if scope_idx == 0 {
            return None;
        }
        let enclosing = scope_idx - 1;
        if let Some(local_idx) = self.resolve_local(enclosing, name) {
            self.scopes[enclosing].locals[local_idx as usize].is_captured = true;
            return Some(self.add_upvalue(scope_idx, local_idx, true));
        }
        if let Some(upvalue_idx) = self.resolve_upvalue(enclosing, name) {
            return Some(self.add_upvalue(scope_idx, upvalue_idx, false));
        }
        None
    }

    fn add_upvalue(&mut self, scope_idx: usize, index: u8, is_local: bool) -> u8 {
        let scope = &mut self.scopes[scope_idx];
        for (i, existing) in scope.upvalues.iter().enumerate() {
            if existing.index == index && existing.is_local == is_local {
                return i as u8;
            }
        }
        if scope.upvalues.len() >= 256 {
            self.error("Too many closure variables in function.");
            return 0;
        }
        scope.upvalues.push(UpvalueDesc { index, is_local });
        scope.function.upvalue_count = scope.upvalues.len() as u8;
        (scope.upvalues.len() - 1) as u8
    }

    // -- declarations / statements ---------------------------------------

    fn declaration(&mut self) {
        if self.match_token(TokenKind::Fun) {
            self.fun_declaration();
        } else if self.match_token(TokenKind::Var) {
            self.var_declaration();
        } else {
            self.statement();
        }
        if self.panic_mode {
            self.synchronize();
        }
    }

    fn fun_declaration(&mut self) {
        let global = self.parse_variable("Expect function name.");
        self.mark_initialized();
        self.function(FunctionType::Function);
        self.define_variable(global);
    }

    fn function(&mut self, fn_type: FunctionType) {
        let name = self.intern_string(self.previous.lexeme);
        self.scopes.push(FunctionScope::new(fn_type, Some(name)));
        self.begin_scope();

        self.consume(TokenKind::LeftParen, "Expect '(' after function name.");
        if !self.check(TokenKind::RightParen) {
            // Counted outside the `u8` arity field itself: `arity` must
            // never be pushed past 255, so the overflow check runs on a
            // plain `usize` before the field is touched at all.
            let mut param_count: usize = 0;
            loop {
                param_count += 1;
                if param_count > 255 {
                    self.error_at_current("Can't have more than 255 parameters.");
                } else {
                    self.scopes.last_mut().expect("scope just pushed").function.arity += 1;
                }
                let param = self.parse_variable("Expect parameter name.");
                self.define_variable(param);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expect ')' after parameters.");
        self.consume(TokenKind::LeftBrace, "Expect '{' before function body.");
        self.block();

        self.emit_return();
        let scope = self.scopes.pop().expect("function scope just pushed");
        let upvalues = scope.upvalues.clone();
        let func_ref = self.heap.alloc(ObjKind::Function, scope.function);
        let constant = self.make_constant(Value::obj(Obj::Function(func_ref)));
        self.emit_bytes(Opcode::Closure as u8, constant);
        for upvalue in upvalues {
            self.emit_byte(if upvalue.is_local { 1 } else { 0 });
            self.emit_byte(upvalue.index);
        }
    }

    fn var_declaration(&mut self) {
        let global = self.parse_variable("Expect variable name.");
        if self.match_token(TokenKind::Equal) {
            self.expression();
        } else {
            self.emit_op(Opcode::Nil);
        }
        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.");
        self.define_variable(global);
    }

    fn statement(&mut self) {
        if self.match_token(TokenKind::Print) {
            self.print_statement();
        } else if self.match_token(TokenKind::For) {
            self.for_statement();
        } else if self.match_token(TokenKind::If) {
            self.if_statement();
        } else if self.match_token(TokenKind::Return) {
            self.return_statement();
        } else if self.match_token(TokenKind::While) {
            self.while_statement();
        } else if self.match_token(TokenKind::LeftBrace) {
            self.begin_scope();
            self.block();
            self.end_scope();
        } else {
            self.expression_statement();
        }
    }

    fn block(&mut self) {
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            self.declaration();
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.");
    }

    fn print_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after value.");
        self.emit_op(Opcode::Print);
    }

    fn expression_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.");
        self.emit_op(Opcode::Pop);
    }

    fn return_statement(&mut self) {
        if self.scopes.last().expect("scope stack non-empty").fn_type == FunctionType::Script {
            self.error("Can't return from top-level code.");
        }
        if self.match_token(TokenKind::Semicolon) {
            self.emit_return();
        } else {
            self.expression();
            self.consume(TokenKind::Semicolon, "Expect ';' after return value.");
            self.emit_op(Opcode::Return);
        }
    }

    fn if_statement(&mut self) {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.");
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after condition.");

        let then_jump = self.emit_jump(Opcode::JumpIfFalse);
        self.emit_op(Opcode::Pop);
        self.statement();

        let else_jump = self.emit_jump(Opcode::Jump);
        self.patch_jump(then_jump);
        self.emit_op(Opcode::Pop);

        if self.match_token(TokenKind::Else) {
            self.statement();
        }
        self.patch_jump(else_jump);
    }

    fn while_statement(&mut self) {
        let loop_start = self.current_chunk().len();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.");
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after condition.");

        let exit_jump = self.emit_jump(Opcode::JumpIfFalse);
        self.emit_op(Opcode::Pop);
        self.statement();
        self.emit_loop(loop_start);

        self.patch_jump(exit_jump);
        self.emit_op(Opcode::Pop);
    }

    fn for_statement(&mut self) {
        self.begin_scope();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.");

        if self.match_token(TokenKind::Semicolon) {
            // no initializer clause
        } else if self.match_token(TokenKind::Var) {
            self.var_declaration();
        } else {
            self.expression_statement();
        }

        let mut loop_start = self.current_chunk().len();
        let mut exit_jump: Option<usize> = None;
        if !self.match_token(TokenKind::Semicolon) {
            self.expression();
            self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.");
            exit_jump = Some(self.emit_jump(Opcode::JumpIfFalse));
            self.emit_op(Opcode::Pop);
        }

        if !self.match_token(TokenKind::RightParen) {
            let body_jump = self.emit_jump(Opcode::Jump);
            let increment_start = self.current_chunk().len();
            self.expression();
            self.emit_op(Opcode::Pop);
            self.consume(TokenKind::RightParen, "Expect ')' after for clauses.");

            self.emit_loop(loop_start);
            loop_start = increment_start;
            self.patch_jump(body_jump);
        }

        self.statement();
        self.emit_loop(loop_start);

        if let Some(exit_jump) = exit_jump {
            self.patch_jump(exit_jump);
            self.emit_op(Opcode::Pop);
        }
        self.end_scope();
    }

    // -- expressions ------------------------------------------------------

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn parse_precedence(&mut self, precedence: Precedence) {
        self.advance();
        let can_assign = precedence <= Precedence::Assignment;
        if !self.prefix_rule(self.previous.kind, can_assign) {
            self.error("Expect expression.");
            return;
        }

        while precedence <= infix_precedence(self.current.kind) {
            self.advance();
            self.infix_rule(self.previous.kind);
        }

        if can_assign && self.match_token(TokenKind::Equal) {
            self.error("Invalid assignment target.");
        }
    }

    fn prefix_rule(&mut self, kind: TokenKind, can_assign: bool) -> bool {
        match kind {
            TokenKind::LeftParen => self.grouping(),
            TokenKind::Minus | TokenKind::Bang => self.unary(),
            TokenKind::Number => self.number(),
            TokenKind::String => self.string(),
            TokenKind::True | TokenKind::False | TokenKind::Nil => self.literal(),
            TokenKind::Identifier => self.variable(can_assign),
            _ => return false,
        }
        true
    }

    fn infix_rule(&mut self, kind: TokenKind) {
        use TokenKind::*;
        match kind {
            Minus | Plus | Slash | Star | BangEqual | EqualEqual | Greater | GreaterEqual
            | Less | LessEqual => self.binary(),
            And => self.and(),
            Or => self.or(),
            LeftParen => self.call(),
            _ => {}
        }
    }

    fn grouping(&mut self) {
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after expression.");
    }

    fn number(&mut self) {
        let value: f64 = self
            .previous
            .lexeme
            .parse()
            .expect("scanner only produces well-formed number lexemes");
        self.emit_constant(Value::number(value));
    }

    fn string(&mut self) {
        let lexeme = self.previous.lexeme;
        let contents = &lexeme[1..lexeme.len() - 1];
        let interned = self.intern_string(contents);
        self.emit_constant(Value::obj(Obj::Str(interned)));
    }

    fn literal(&mut self) {
        match self.previous.kind {
            TokenKind::False => self.emit_op(Opcode::False),
            TokenKind::True => self.emit_op(Opcode::True),
            TokenKind::Nil => self.emit_op(Opcode::Nil),
            _ => unreachable!("literal() only dispatched for false/true/nil"),
        }
    }

    fn unary(&mut self) {
        let op_kind = self.previous.kind;
        self.parse_precedence(Precedence::Unary);
        match op_kind {
            TokenKind::Bang => self.emit_op(Opcode::Not),
            TokenKind::Minus => self.emit_op(Opcode::Negate),
            _ => unreachable!("unary() only dispatched for !/-"),
        }
    }

    fn binary(&mut self) {
        let op_kind = self.previous.kind;
        let precedence = infix_precedence(op_kind);
        self.parse_precedence(precedence.next());
        match op_kind {
            TokenKind::BangEqual => {
                self.emit_op(Opcode::Equal);
                self.emit_op(Opcode::Not);
            }
            TokenKind::EqualEqual => self.emit_op(Opcode::Equal),
            TokenKind::Greater => self.emit_op(Opcode::Greater),
            TokenKind::GreaterEqual => {
                self.emit_op(Opcode::Less);
                self.emit_op(Opcode::Not);
            }
            TokenKind::Less => self.emit_op(Opcode::Less),
            TokenKind::LessEqual => {
                self.emit_op(Opcode::Greater);
                self.emit_op(Opcode::Not);
            }
            TokenKind::Plus => self.emit_op(Opcode::Add),
            TokenKind::Minus => self.emit_op(Opcode::Subtract),
            TokenKind::Star => self.emit_op(Opcode::Multiply),
            TokenKind::Slash => self.emit_op(Opcode::Divide),
            _ => unreachable!("binary() only dispatched for binary operators"),
        }
    }

    fn and(&mut self) {
        let end_jump = self.emit_jump(Opcode::JumpIfFalse);
        self.emit_op(Opcode::Pop);
        self.parse_precedence(Precedence::And);
        self.patch_jump(end_jump);
    }

    fn or(&mut self) {
        let else_jump = self.emit_jump(Opcode::JumpIfFalse);
        let end_jump = self.emit_jump(Opcode::Jump);
        self.patch_jump(else_jump);
        self.emit_op(Opcode::Pop);
        self.parse_precedence(Precedence::Or);
        self.patch_jump(end_jump);
    }

    fn variable(&mut self, can_assign: bool) {
        self.named_variable(self.previous.lexeme, can_assign);
    }

    fn named_variable(&mut self, name: &'src str, can_assign: bool) {
        let scope_idx = self.scopes.len() - 1;
        let (get_op, set_op, arg) = if let Some(local) = self.resolve_local(scope_idx, name) {
            (Opcode::GetLocal, Opcode::SetLocal, local)
        } else if let Some(upvalue) = self.resolve_upvalue(scope_idx, name) {
            (Opcode::GetUpvalue, Opcode::SetUpvalue, upvalue)
        } else {
            let global = self.identifier_constant(name);
            (Opcode::GetGlobal, Opcode::SetGlobal, global)
        };

        if can_assign && self.match_token(TokenKind::Equal) {
            self.expression();
            self.emit_bytes(set_op as u8, arg);
        } else {
            self.emit_bytes(get_op as u8, arg);
        }
    }

    fn call(&mut self) {
        let arg_count = self.argument_list();
        self.emit_bytes(Opcode::Call as u8, arg_count);
    }

    fn argument_list(&mut self) -> u8 {
        let mut count: u8 = 0;
        if !self.check(TokenKind::RightParen) {
            loop {
                self.expression();
                if count == 255 {
                    self.error("Can't have more than 255 arguments.");
                } else {
                    count += 1;
                }
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expect ')' after arguments.");
        count
    }
}
