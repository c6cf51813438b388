//! Parser error types.

use crate::{Function, Span};
use eql_core::Operator;
use std::fmt;

/// What made a query unparseable.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// The grammar wanted `expected` where `found` stands.
    UnexpectedToken { expected: String, found: String },
    UnexpectedCharacter(char),
    UnterminatedString,
    InvalidNumber(String),
    /// A call to a function outside [`Function::ALL`].
    UnknownFunction(String),
    FunctionArguments { function: Function, found: String },
    /// A parenthesised list after an operator comparing with one value.
    ListNotAllowed { operator: Operator },
    /// A sort key without `asc` or `desc`.
    MissingDirection { property: String, found: String },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            ParseErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character '{}'", c),
            ParseErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            ParseErrorKind::InvalidNumber(text) => write!(f, "invalid number literal '{}'", text),
            ParseErrorKind::UnknownFunction(name) => {
                let known: Vec<String> = Function::ALL.iter().map(|function| function.to_string()).collect();
                write!(f, "unknown function '{}', known: {}", name, known.join(", "))
            }
            ParseErrorKind::FunctionArguments { function, found } => {
                write!(f, "function '{}' takes no arguments, found {}", function.name(), found)
            }
            ParseErrorKind::ListNotAllowed { operator } => {
                write!(f, "a list of values is not allowed after '{}'", operator)
            }
            ParseErrorKind::MissingDirection { property, found } => {
                write!(f, "expected ASC or DESC after '{}', found {}", property, found)
            }
        }
    }
}

/// A parse error at a position in the query text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn unexpected_token(span: Span, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken {
                expected: expected.into(),
                found: found.into(),
            },
            span,
        )
    }

    /// Description of the offending token, when one was read.
    pub fn found(&self) -> Option<&str> {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { found, .. }
            | ParseErrorKind::FunctionArguments { found, .. }
            | ParseErrorKind::MissingDirection { found, .. } => Some(found),
            ParseErrorKind::InvalidNumber(text) | ParseErrorKind::UnknownFunction(text) => Some(text),
            _ => None,
        }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }

    /// Byte offset of the offending token in the query text.
    pub fn position(&self) -> usize {
        self.span.start
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.span.line, self.span.column, self.kind
        )
    }
}

impl std::error::Error for ParseError {}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
