use crate::token::{Token, TokenKind};

/// Byte-oriented lexer producing one token per `next_token` call, ending
/// with an `Eof` token. Lines and columns are 1-based; the column counter
/// resets at every newline.
pub struct Lexer {
    input: Vec<u8>,
    position: usize,
    read_position: usize,
    ch: u8,
    line: usize,
    column: usize,
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic()
}

impl Lexer {
    pub fn new(input: &str) -> Lexer {
        let mut lexer = Lexer {
            input: input.as_bytes().to_vec(),
            position: 0,
            read_position: 0,
            ch: 0,
            line: 1,
            column: 0,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        if self.read_position >= self.input.len() {
            self.ch = 0;
        } else {
            self.column += 1;
            self.ch = self.input[self.read_position];
        }

        if self.ch == b'\n' {
            self.line += 1;
            self.column = 0;
        }

        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> u8 {
        if self.read_position >= self.input.len() {
            0
        } else {
            self.input[self.read_position]
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\n') {
            self.read_char();
        }
    }

    fn read_identifier(&mut self) -> String {
        let position = self.position;
        self.read_char();
        while is_letter(self.ch) || self.ch.is_ascii_digit() || self.ch == b'_' {
            self.read_char();
        }
        String::from_utf8_lossy(&self.input[position..self.position]).into_owned()
    }

    fn read_number(&mut self) -> String {
        let position = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        String::from_utf8_lossy(&self.input[position..self.position]).into_owned()
    }

    /// Reads the body of a string literal. `\n`, `\t` and `\"` are escape
    /// sequences; a backslash before anything else stays a literal backslash
    /// followed by that character. An unterminated literal ends at
    /// end-of-input and still yields a token.
    fn read_string(&mut self) -> String {
        let mut buffer = Vec::new();
        loop {
            self.read_char();
            match self.ch {
                0 | b'"' => break,
                b'\\' => {
                    self.read_char();
                    match self.ch {
                        b'n' => buffer.push(b'\n'),
                        b't' => buffer.push(b'\t'),
                        b'"' => buffer.push(b'"'),
                        0 => {
                            buffer.push(b'\\');
                            break;
                        }
                        other => {
                            buffer.push(b'\\');
                            buffer.push(other);
                        }
                    }
                }
                other => buffer.push(other),
            }
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }

    fn single(&self, kind: TokenKind) -> Token {
        Token::new(kind, (self.ch as char).to_string(), self.line, self.column)
    }

    /// Recognizes a two-character operator by peeking; falls back to the
    /// single-character kind. The token records the first character's column.
    fn two_char_operator(&mut self, next: u8, double: TokenKind, single: TokenKind) -> Token {
        let line = self.line;
        let column = self.column;
        if self.peek_char() == next {
            self.read_char();
            Token::new(double, double.to_string(), line, column)
        } else {
            Token::new(single, (self.ch as char).to_string(), line, column)
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let token = match self.ch {
            b'=' => self.two_char_operator(b'=', TokenKind::Eq, TokenKind::Assign),
            b'!' => self.two_char_operator(b'=', TokenKind::NotEq, TokenKind::Bang),
            b'*' => self.two_char_operator(b'*', TokenKind::Exp, TokenKind::Asterisk),
            b'<' => self.two_char_operator(b'=', TokenKind::Lte, TokenKind::Lt),
            b'>' => self.two_char_operator(b'=', TokenKind::Gte, TokenKind::Gt),
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'/' => self.single(TokenKind::Slash),
            b'|' => self.single(TokenKind::Vertical),
            b'%' => self.single(TokenKind::Percent),
            b',' => self.single(TokenKind::Comma),
            b';' => self.single(TokenKind::Semicolon),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b':' => self.single(TokenKind::Colon),
            b'"' => {
                let line = self.line;
                let column = self.column;
                let literal = self.read_string();
                Token::new(TokenKind::String, literal, line, column)
            }
            0 => Token::new(TokenKind::Eof, "", self.line, self.column),
            _ => {
                let line = self.line;
                let column = self.column;
                if is_letter(self.ch) || self.ch == b'_' {
                    let literal = self.read_identifier();
                    let kind = TokenKind::lookup_identifier(&literal);
                    return Token::new(kind, literal, line, column);
                }
                if self.ch.is_ascii_digit() {
                    let literal = self.read_number();
                    return Token::new(TokenKind::Int, literal, line, column);
                }
                Token::new(TokenKind::Illegal, (self.ch as char).to_string(), line, column)
            }
        };
        self.read_char();
        token
    }
}
