//! Lexer (tokenizer) for EQL query text.

use crate::{ParseError, ParseErrorKind, ParseResult, Span};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords (case-insensitive)
    And,
    Or,
    Not,
    In,
    Like,
    ILike,
    Contains,
    Is,
    Null,

    // Literals
    Ident(String),
    Int(i64),
    Float(f64),
    String(String),

    // Symbols
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Dot,      // .
    Eq,       // =
    NotEq,    // != or <>
    Lt,       // <
    LtEq,     // <=
    Gt,       // >
    GtEq,     // >=

    // End of input
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::In => "IN",
            TokenKind::Like => "LIKE",
            TokenKind::ILike => "ILIKE",
            TokenKind::Contains => "CONTAINS",
            TokenKind::Is => "IS",
            TokenKind::Null => "NULL",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) => "integer",
            TokenKind::Float(_) => "number",
            TokenKind::String(_) => "string",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Eq => "'='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::Eof => "end of input",
        }
    }

    /// Name plus content, for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => format!("identifier '{}'", s),
            TokenKind::Int(i) => format!("integer {}", i),
            TokenKind::Float(f) => format!("number {}", f),
            TokenKind::String(s) => format!("string '{}'", s),
            other => other.name().to_string(),
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::In
                | TokenKind::Like
                | TokenKind::ILike
                | TokenKind::Contains
                | TokenKind::Is
                | TokenKind::Null
        )
    }
}

/// A token with its span.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(pos: usize, line: usize, column: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::new(pos, pos, line, column),
        }
    }
}

/// Lexer state.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize all input into a vector of tokens ending with `Eof`.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn span_from(&self, start: usize, start_line: usize, start_col: usize) -> Span {
        Span::new(start, self.pos, start_line, start_col)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn next_char(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.pos = pos + c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.column;

        let Some(c) = self.next_char() else {
            return Ok(Token::eof(self.pos, self.line, self.column));
        };

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '=' => TokenKind::Eq,
            '<' => match self.peek_char() {
                Some('=') => {
                    self.next_char();
                    TokenKind::LtEq
                }
                Some('>') => {
                    self.next_char();
                    TokenKind::NotEq
                }
                _ => TokenKind::Lt,
            },
            '>' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    TokenKind::NotEq
                } else {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedCharacter('!'),
                        self.span_from(start, start_line, start_col),
                    ));
                }
            }
            '\'' | '"' => self.scan_string(c, start, start_line, start_col)?,
            '-' if self.peek_char().is_some_and(|n| n.is_ascii_digit()) => {
                self.scan_number(c, start, start_line, start_col)?
            }
            '0'..='9' => self.scan_number(c, start, start_line, start_col)?,
            c if c == '_' || c.is_alphabetic() => self.scan_ident_or_keyword(c),
            _ => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedCharacter(c),
                    self.span_from(start, start_line, start_col),
                ));
            }
        };

        Ok(Token::new(
            kind,
            self.span_from(start, start_line, start_col),
        ))
    }

    /// Scan a string closed by `quote`. `\<quote>` and `\\` are escapes; any
    /// other backslash sequence is kept as written so LIKE escapes survive.
    fn scan_string(
        &mut self,
        quote: char,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> ParseResult<TokenKind> {
        let mut value = String::new();

        loop {
            match self.next_char() {
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnterminatedString,
                        self.span_from(start, start_line, start_col),
                    ));
                }
                Some(c) if c == quote => break,
                Some('\\') => match self.next_char() {
                    Some(c) if c == quote || c == '\\' => value.push(c),
                    Some(c) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnterminatedString,
                            self.span_from(start, start_line, start_col),
                        ));
                    }
                },
                Some(c) => value.push(c),
            }
        }

        Ok(TokenKind::String(value))
    }

    fn scan_ident_or_keyword(&mut self, first: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first);

        while let Some(c) = self.peek_char() {
            if c == '_' || c.is_alphanumeric() {
                ident.push(c);
                self.next_char();
            } else {
                break;
            }
        }

        match ident.to_uppercase().as_str() {
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            "IN" => TokenKind::In,
            "LIKE" => TokenKind::Like,
            "ILIKE" => TokenKind::ILike,
            "CONTAINS" => TokenKind::Contains,
            "IS" => TokenKind::Is,
            "NULL" => TokenKind::Null,
            _ => TokenKind::Ident(ident),
        }
    }

    fn scan_number(
        &mut self,
        first: char,
        start: usize,
        start_line: usize,
        start_col: usize,
    ) -> ParseResult<TokenKind> {
        let mut number = String::new();
        number.push(first);
        self.scan_digits(&mut number);

        // A '.' only belongs to the number when a digit follows it.
        let mut lookahead = self.chars.clone();
        let has_decimal = matches!(lookahead.next(), Some((_, '.')))
            && matches!(lookahead.peek(), Some((_, d)) if d.is_ascii_digit());
        if has_decimal {
            number.push('.');
            self.next_char();
            self.scan_digits(&mut number);
        }

        let has_exponent = matches!(self.peek_char(), Some('e' | 'E'));
        if has_exponent {
            number.push('e');
            self.next_char();
            if let Some(sign @ ('+' | '-')) = self.peek_char() {
                number.push(sign);
                self.next_char();
            }
            let before = number.len();
            self.scan_digits(&mut number);
            if number.len() == before {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidNumber(number.clone()),
                    self.span_from(start, start_line, start_col),
                ));
            }
        }

        if has_decimal || has_exponent {
            let value: f64 = number.parse().map_err(|_| {
                ParseError::new(
                    ParseErrorKind::InvalidNumber(number.clone()),
                    self.span_from(start, start_line, start_col),
                )
            })?;
            Ok(TokenKind::Float(value))
        } else {
            let value: i64 = number.parse().map_err(|_| {
                ParseError::new(
                    ParseErrorKind::InvalidNumber(number.clone()),
                    self.span_from(start, start_line, start_col),
                )
            })?;
            Ok(TokenKind::Int(value))
        }
    }

    fn scan_digits(&mut self, number: &mut String) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                number.push(c);
                self.next_char();
            } else {
                break;
            }
        }
    }
}
