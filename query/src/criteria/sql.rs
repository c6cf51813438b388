//! The criteria model and its SQL rendering.

use crate::PageRequest;
use eql_core::{Direction, Value};
use std::fmt::Write;

/// Format of dates in SQL parameters and columns.
pub const SQL_DATE_FORMAT: &str = "%Y-%m-%d";
/// Format of date-times in SQL parameters and columns. Fixed width down to
/// the nanosecond, so text order is instant order.
pub const SQL_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<&Value> for SqlValue {
    fn from(value: &Value) -> Self {
        match value.identity() {
            Value::Null | Value::List(_) | Value::Ref(_) => SqlValue::Null,
            Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
            Value::Int(i) => SqlValue::Integer(*i),
            Value::Float(f) => SqlValue::Real(*f),
            Value::Text(s) | Value::Enum(s) => SqlValue::Text(s.clone()),
            Value::Date(d) => SqlValue::Text(d.format(SQL_DATE_FORMAT).to_string()),
            Value::DateTime(dt) => SqlValue::Text(dt.format(SQL_DATE_TIME_FORMAT).to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// `<kind> JOIN <table> <alias> ON <alias>.<column> = <owner_column>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: String,
    pub column: String,
    pub owner_column: String,
}

/// A table with its joins.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub table: String,
    pub alias: String,
    pub joins: Vec<Join>,
}

impl Source {
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            joins: Vec::new(),
        }
    }
}

/// A correlated sub-select used by `EXISTS`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubQuery {
    pub source: Source,
    /// Column of the sub-select equal to `outer`.
    pub inner: String,
    pub outer: String,
    pub restriction: Option<Restriction>,
}

/// A WHERE clause tree. Column names are alias-qualified.
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
    And(Vec<Restriction>),
    Or(Vec<Restriction>),
    Compare {
        column: String,
        operator: &'static str,
        value: SqlValue,
    },
    Like {
        column: String,
        pattern: SqlValue,
        case_insensitive: bool,
        negated: bool,
    },
    In {
        column: String,
        values: Vec<SqlValue>,
        negated: bool,
    },
    Null {
        column: String,
        negated: bool,
    },
    Exists {
        subquery: Box<SubQuery>,
        negated: bool,
    },
}

/// A complete relational query for one entity table.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    pub source: Source,
    pub restriction: Option<Restriction>,
    pub orders: Vec<(String, Direction)>,
    pub limit: Option<PageRequest>,
}

impl Criteria {
    pub fn with_page(mut self, request: PageRequest) -> Self {
        self.limit = Some(request);
        self
    }

    /// `SELECT <alias>.* ...` with the rows in query order; rows tied on every
    /// sort key keep their insertion order.
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut w = SqlWriter::default();
        let _ = write!(w.sql, "SELECT {}.*", self.source.alias);
        self.write_body(&mut w);

        w.sql.push_str(" ORDER BY ");
        for (column, direction) in &self.orders {
            let _ = write!(w.sql, "{} {}, ", column, direction);
        }
        let _ = write!(w.sql, "{}.rowid", self.source.alias);

        if let Some(page) = self.limit {
            w.sql.push_str(" LIMIT ? OFFSET ?");
            w.params.push(SqlValue::Integer(to_i64(page.size)));
            w.params.push(SqlValue::Integer(to_i64(page.offset())));
        }
        (w.sql, w.params)
    }

    /// `SELECT COUNT(*) ...` over the same rows, ignoring paging.
    pub fn to_count_sql(&self) -> (String, Vec<SqlValue>) {
        let mut w = SqlWriter::default();
        w.sql.push_str("SELECT COUNT(*)");
        self.write_body(&mut w);
        (w.sql, w.params)
    }

    fn write_body(&self, w: &mut SqlWriter) {
        w.sql.push_str(" FROM ");
        w.source(&self.source);
        if let Some(restriction) = &self.restriction {
            w.sql.push_str(" WHERE ");
            w.restriction(restriction);
        }
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[derive(Default)]
struct SqlWriter {
    sql: String,
    params: Vec<SqlValue>,
}

impl SqlWriter {
    fn source(&mut self, source: &Source) {
        let _ = write!(self.sql, "{} {}", source.table, source.alias);
        for join in &source.joins {
            let kind = match join.kind {
                JoinKind::Inner => "JOIN",
                JoinKind::Left => "LEFT JOIN",
            };
            let _ = write!(
                self.sql,
                " {} {} {} ON {}.{} = {}",
                kind, join.table, join.alias, join.alias, join.column, join.owner_column
            );
        }
    }

    fn param(&mut self, value: &SqlValue) {
        self.sql.push('?');
        self.params.push(value.clone());
    }

    fn junction(&mut self, children: &[Restriction], separator: &str, empty: &str) {
        if children.is_empty() {
            self.sql.push_str(empty);
            return;
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(separator);
            }
            self.sql.push('(');
            self.restriction(child);
            self.sql.push(')');
        }
    }

    fn restriction(&mut self, restriction: &Restriction) {
        match restriction {
            Restriction::And(children) => self.junction(children, " AND ", "1 = 1"),
            Restriction::Or(children) => self.junction(children, " OR ", "1 = 0"),
            Restriction::Compare {
                column,
                operator,
                value,
            } => {
                let _ = write!(self.sql, "{} {} ", column, operator);
                self.param(value);
            }
            Restriction::Like {
                column,
                pattern,
                case_insensitive,
                negated,
            } => {
                let not = if *negated { "NOT " } else { "" };
                if *case_insensitive {
                    let _ = write!(self.sql, "LOWER({}) {}LIKE LOWER(", column, not);
                    self.param(pattern);
                    self.sql.push(')');
                } else {
                    let _ = write!(self.sql, "{} {}LIKE ", column, not);
                    self.param(pattern);
                }
                self.sql.push_str(" ESCAPE '\\'");
            }
            Restriction::In {
                column,
                values,
                negated,
            } => {
                let not = if *negated { "NOT " } else { "" };
                let _ = write!(self.sql, "{} {}IN (", column, not);
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.param(value);
                }
                self.sql.push(')');
            }
            Restriction::Null { column, negated } => {
                let not = if *negated { "NOT " } else { "" };
                let _ = write!(self.sql, "{} IS {}NULL", column, not);
            }
            Restriction::Exists { subquery, negated } => {
                let not = if *negated { "NOT " } else { "" };
                let _ = write!(self.sql, "{}EXISTS (SELECT 1 FROM ", not);
                self.source(&subquery.source);
                let _ = write!(self.sql, " WHERE {} = {}", subquery.inner, subquery.outer);
                if let Some(inner) = &subquery.restriction {
                    self.sql.push_str(" AND (");
                    self.restriction(inner);
                    self.sql.push(')');
                }
                self.sql.push(')');
            }
        }
    }
}
