//! EQL Parser
//!
//! This crate turns EQL text into an Abstract Query:
//! - Tokenizing with case-insensitive keywords and quoted strings
//! - Conditions joined by AND/OR with parentheses (AND binds tighter)
//! - Operands: literals, bare tokens, lists and zero-argument functions
//! - A trailing `order by` clause
//! - Error reporting with line/column and the offending token

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::*;
pub use error::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_query, Parser};
