//! Value types for EQL operands and entity properties.
//!
//! Values are what prepared conditions compare against. Raw query operands are
//! untyped; preparation turns them into one of these variants according to the
//! declared type of the property they are compared with.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::cmp::Ordering;
use std::fmt;

/// Canonical format of date literals.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical format of date-time literals.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Date-time format including seconds.
pub const DATE_TIME_SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Date-time format including seconds and, when present, their fraction.
pub const DATE_TIME_FRACTION_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without zone.
    DateTime(NaiveDateTime),
    /// Enum constant, by name.
    Enum(String),
    /// Reference to another entity, by id.
    Ref(EntityRef),
    /// List of values (collection properties).
    List(Vec<Value>),
}

/// Reference to an entity instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRef {
    pub entity: String,
    pub id: Box<Value>,
}

impl EntityRef {
    pub fn new(entity: impl Into<String>, id: impl Into<Value>) -> Self {
        Self {
            entity: entity.into(),
            id: Box::new(id.into()),
        }
    }
}

impl Value {
    /// Build an entity reference value.
    pub fn reference(entity: impl Into<String>, id: impl Into<Value>) -> Self {
        Value::Ref(EntityRef::new(entity, id))
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as string reference if this is a Text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the list items if this is a List value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The value an entity reference stands for when compared or stored: its id.
    pub fn identity(&self) -> &Value {
        match self {
            Value::Ref(r) => r.id.identity(),
            other => other,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Text(_) => "Text",
            Value::Date(_) => "Date",
            Value::DateTime(_) => "DateTime",
            Value::Enum(_) => "Enum",
            Value::Ref(_) => "Ref",
            Value::List(_) => "List",
        }
    }

    /// Equality as a query sees it: numbers compare numerically and
    /// references compare by id. Null equals nothing.
    pub fn matches(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (a, b) => a == b,
        }
    }

    /// Natural ordering between two non-null values of the same family.
    /// Returns `None` for incomparable values.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self.identity(), other.identity()) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Compare values for sorting. Null sorts before any other value;
    /// incomparable values are treated as equal so a stable sort keeps their order.
    pub fn cmp_sortable(&self, other: &Value) -> Ordering {
        match (self.identity(), other.identity()) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (a, b) => a.compare(b).unwrap_or(Ordering::Equal),
        }
    }
}

/// Parse a date literal (`yyyy-MM-dd`, a trailing time part is ignored).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| parse_date_time(text).map(|dt| dt.date()))
}

/// Parse a date-time literal (`yyyy-MM-dd HH:mm`, `yyyy-MM-dd HH:mm:ss`
/// with an optional fraction, or a bare date meaning midnight).
pub fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, DATE_TIME_FRACTION_FORMAT))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Quote text as an EQL string literal.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        if c == '\\' || c == '\'' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Renders the value as an EQL literal.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Text(s) => write!(f, "{}", quote(s)),
            Value::Date(d) => write!(f, "'{}'", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => {
                let format = match (dt.second(), dt.nanosecond()) {
                    (0, 0) => DATE_TIME_FORMAT,
                    (_, 0) => DATE_TIME_SECONDS_FORMAT,
                    _ => DATE_TIME_FRACTION_FORMAT,
                };
                write!(f, "'{}'", dt.format(format))
            }
            Value::Enum(name) => write!(f, "{}", name),
            Value::Ref(r) => write!(f, "{}", r.id),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<EntityRef> for Value {
    fn from(r: EntityRef) -> Self {
        Value::Ref(r)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
