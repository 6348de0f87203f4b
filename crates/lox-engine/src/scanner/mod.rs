//! Pull-based scanner: turns source text into a stream of tokens on demand.
//!
//! Ported directly from `examples/original_source/c/source/scanner.c`: a
//! cursor pair (`start`, `current`) over the source bytes plus a line
//! counter, with no internal allocation — token lifetimes are bounded by
//! the source buffer's lifetime.

mod token;

pub use token::{Token, TokenKind};

/// Pull-based tokenizer. Call [`Scanner::scan_token`] repeatedly; it
/// returns `TokenKind::Eof` forever once the source is exhausted.
pub struct Scanner<'src> {
    source: &'src [u8],
    start: usize,
    current: usize,
    line: u32,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    pub fn scan_token(&mut self) -> Token<'src> {
        self.skip_whitespace();
        self.start = self.current;

        if self.is_at_end() {
            return self.make_token(TokenKind::Eof);
        }

        let c = self.advance();
        if is_alpha(c) {
            return self.identifier();
        }
        if is_digit(c) {
            return self.number();
        }

        match c {
            b'(' => self.make_token(TokenKind::LeftParen),
            b')' => self.make_token(TokenKind::RightParen),
            b'{' => self.make_token(TokenKind::LeftBrace),
            b'}' => self.make_token(TokenKind::RightBrace),
            b';' => self.make_token(TokenKind::Semicolon),
            b',' => self.make_token(TokenKind::Comma),
            b'.' => self.make_token(TokenKind::Dot),
            b'-' => self.make_token(TokenKind::Minus),
            b'+' => self.make_token(TokenKind::Plus),
            b'/' => self.make_token(TokenKind::Slash),
            b'*' => self.make_token(TokenKind::Star),
            b'!' => {
                let kind = if self.matches(b'=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.make_token(kind)
            }
            b'=' => {
                let kind = if self.matches(b'=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.make_token(kind)
            }
            b'<' => {
                let kind = if self.matches(b'=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.make_token(kind)
            }
            b'>' => {
                let kind = if self.matches(b'=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.make_token(kind)
            }
            b'"' => self.string(),
            _ => self.error_token("Unexpected character"),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn matches(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> u8 {
        if self.current + 1 >= self.source.len() {
            0
        } else {
            self.source[self.current + 1]
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\r' | b'\t' => {
                    self.advance();
                }
                b'\n' => {
                    self.line += 1;
                    self.advance();
                }
                b'/' => {
                    if self.peek_next() == b'/' {
                        while self.peek() != b'\n' && !self.is_at_end() {
                            self.advance();
                        }
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    fn string(&mut self) -> Token<'src> {
        while self.peek() != b'"' && !self.is_at_end() {
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            return self.error_token("Unterminated string");
        }
        self.advance();
        self.make_token(TokenKind::String)
    }

    fn number(&mut self) -> Token<'src> {
        while is_digit(self.peek()) {
            self.advance();
        }
        if self.peek() == b'.' && is_digit(self.peek_next()) {
            self.advance();
            while is_digit(self.peek()) {
                self.advance();
            }
        }
        self.make_token(TokenKind::Number)
    }

    fn identifier(&mut self) -> Token<'src> {
        while is_alpha(self.peek()) || is_digit(self.peek()) {
            self.advance();
        }
        self.make_token(self.identifier_kind())
    }

    /// Hand-written trie keyed on the first (and, for `f`/`t`, second)
    /// letter, matching `scanner.c`'s `identifier_type`.
    fn identifier_kind(&self) -> TokenKind {
        let lexeme = &self.source[self.start..self.current];
        match lexeme.first() {
            Some(b'a') => self.check_keyword(1, "nd", TokenKind::And),
            Some(b'c') => self.check_keyword(1, "lass", TokenKind::Class),
            Some(b'e') => self.check_keyword(1, "lse", TokenKind::Else),
            Some(b'f') if lexeme.len() > 1 => match lexeme[1] {
                b'a' => self.check_keyword(2, "lse", TokenKind::False),
                b'o' => self.check_keyword(2, "r", TokenKind::For),
                b'u' => self.check_keyword(2, "n", TokenKind::Fun),
                _ => TokenKind::Identifier,
            },
            Some(b'i') => self.check_keyword(1, "f", TokenKind::If),
            Some(b'n') => self.check_keyword(1, "il", TokenKind::Nil),
            Some(b'o') => self.check_keyword(1, "r", TokenKind::Or),
            Some(b'p') => self.check_keyword(1, "rint", TokenKind::Print),
            Some(b'r') => self.check_keyword(1, "eturn", TokenKind::Return),
            Some(b's') => self.check_keyword(1, "uper", TokenKind::Super),
            Some(b't') if lexeme.len() > 1 => match lexeme[1] {
                b'h' => self.check_keyword(2, "is", TokenKind::This),
                b'r' => self.check_keyword(2, "ue", TokenKind::True),
                _ => TokenKind::Identifier,
            },
            Some(b'v') => self.check_keyword(1, "ar", TokenKind::Var),
            Some(b'w') => self.check_keyword(1, "hile", TokenKind::While),
            _ => TokenKind::Identifier,
        }
    }

    fn check_keyword(&self, start: usize, rest: &str, kind: TokenKind) -> TokenKind {
        let lexeme = &self.source[self.start..self.current];
        let candidate = &lexeme[start.min(lexeme.len())..];
        if candidate == rest.as_bytes() {
            kind
        } else {
            TokenKind::Identifier
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        // Source is required to be valid UTF-8; every token boundary the
        // scanner produces falls on an ASCII byte, so this slice is safe.
        let lexeme = std::str::from_utf8(&self.source[self.start..self.current])
            .expect("token boundaries fall on ASCII bytes");
        Token {
            kind,
            lexeme,
            line: self.line,
        }
    }

    fn error_token(&self, message: &'static str) -> Token<'src> {
        Token {
            kind: TokenKind::Error,
            lexeme: message,
            line: self.line,
        }
    }
}

fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(src);
        let mut out = Vec::new();
        loop {
            let tok = scanner.scan_token();
            let done = tok.is_eof();
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn scans_punctuation_and_two_char_operators() {
        assert_eq!(
            kinds("!= <= >= =="),
            vec![
                TokenKind::BangEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::EqualEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_trie_resolves_f_and_t_prefixes() {
        assert_eq!(
            kinds("false for fun this true thing"),
            vec![
                TokenKind::False,
                TokenKind::For,
                TokenKind::Fun,
                TokenKind::This,
                TokenKind::True,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_comments_and_counts_lines() {
        let mut scanner = Scanner::new("// hi\nvar");
        let tok = scanner.scan_token();
        assert_eq!(tok.kind, TokenKind::Var);
        assert_eq!(tok.line, 2);
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        let mut scanner = Scanner::new("\"abc");
        let tok = scanner.scan_token();
        assert_eq!(tok.kind, TokenKind::Error);
        assert_eq!(tok.lexeme, "Unterminated string");
    }

    #[test]
    fn number_requires_digit_after_dot() {
        let mut scanner = Scanner::new("1. 2");
        assert_eq!(scanner.scan_token().kind, TokenKind::Number);
        assert_eq!(scanner.scan_token().kind, TokenKind::Dot);
    }
}
