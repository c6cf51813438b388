//! Abstract Query types.
//!
//! The parser produces an untyped tree: property paths are plain strings and
//! operands keep the shape they had in the query text. Types are assigned
//! later, when the query is prepared against the property registry.

use eql_core::{quote, Operator, Query, Value};
use std::fmt;

/// Source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// Functions usable as operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Today,
    Now,
    CurrentUser,
}

impl Function {
    pub const ALL: [Function; 3] = [Function::Today, Function::Now, Function::CurrentUser];

    pub fn name(&self) -> &'static str {
        match self {
            Function::Today => "today",
            Function::Now => "now",
            Function::CurrentUser => "currentUser",
        }
    }

    /// Look up a function by name, ignoring case.
    pub fn lookup(name: &str) -> Option<Function> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// An untyped operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// The `null` keyword.
    Null,
    /// Quoted string.
    String(String),
    Integer(i64),
    Decimal(f64),
    /// Bare word: enum constant, boolean or id, decided at preparation.
    Token(String),
    Function(Function),
    List(Vec<Operand>),
    /// Already-typed value, for queries built in code.
    Value(Value),
}

/// A condition as written in the query.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCondition {
    pub property: String,
    pub operator: Operator,
    /// `None` for `is null`, `is empty` and their negations.
    pub operand: Option<Operand>,
}

impl RawCondition {
    pub fn new(property: impl Into<String>, operator: Operator, operand: Operand) -> Self {
        Self {
            property: property.into(),
            operator,
            operand: Some(operand),
        }
    }

    pub fn unary(property: impl Into<String>, operator: Operator) -> Self {
        Self {
            property: property.into(),
            operator,
            operand: None,
        }
    }
}

/// The Abstract Query: raw conditions and sort clauses on property names.
pub type RawQuery = Query<RawCondition, String>;

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::String(s.to_string())
    }
}

impl From<i64> for Operand {
    fn from(i: i64) -> Self {
        Operand::Integer(i)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}()", self.name())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Null => write!(f, "NULL"),
            Operand::String(s) => write!(f, "{}", quote(s)),
            Operand::Integer(i) => write!(f, "{}", i),
            Operand::Decimal(d) => write!(f, "{:?}", d),
            Operand::Token(t) => write!(f, "{}", t),
            Operand::Function(func) => write!(f, "{}", func),
            Operand::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Operand::Value(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Display for RawCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.operator)?;
        if let Some(operand) = &self.operand {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}
