//! Operand coercion to declared property types.

use crate::functions;
use crate::{PrepareError, PrepareResult, QueryContext};
use eql_core::{parse_date, parse_date_time, EntityRef, PropertyType, Value};
use eql_parser::Operand;
use eql_registry::Registry;

/// An operand reduced to what coercion needs to know about it.
enum Literal {
    Text(String),
    Int(i64),
    Float(f64),
    Typed(Value),
}

impl From<Value> for Literal {
    fn from(value: Value) -> Self {
        match value {
            Value::Text(s) => Literal::Text(s),
            Value::Int(i) => Literal::Int(i),
            Value::Float(f) => Literal::Float(f),
            other => Literal::Typed(other),
        }
    }
}

/// Converts operands to values of a declared type.
pub(crate) struct Coercer<'a> {
    registry: &'a Registry,
    context: &'a QueryContext,
    /// Path of the property being compared, for error messages.
    property: String,
}

impl<'a> Coercer<'a> {
    pub(crate) fn new(registry: &'a Registry, context: &'a QueryContext, property: String) -> Self {
        Self {
            registry,
            context,
            property,
        }
    }

    /// Coerce one (non-list) operand. `null` stays `Value::Null`.
    pub(crate) fn coerce(&self, operand: &Operand, target: &PropertyType) -> PrepareResult<Value> {
        let literal = match operand {
            Operand::Null => return Ok(Value::Null),
            Operand::Value(Value::Null) => return Ok(Value::Null),
            Operand::String(s) | Operand::Token(s) => Literal::Text(s.clone()),
            Operand::Integer(i) => Literal::Int(*i),
            Operand::Decimal(d) => Literal::Float(*d),
            Operand::Value(v) => Literal::from(v.clone()),
            Operand::Function(function) => {
                return functions::resolve(*function, target, self.context, &self.property, |text| {
                    self.convert(Literal::Text(text), target, &operand.to_string())
                });
            }
            Operand::List(_) => {
                return Err(self.error(operand.to_string(), target, "nested lists are not supported"))
            }
        };
        self.convert(literal, target, &operand.to_string())
    }

    fn convert(&self, literal: Literal, target: &PropertyType, raw: &str) -> PrepareResult<Value> {
        let converted = match (target, literal) {
            (PropertyType::Collection(element), literal) => {
                return self.convert(literal, element, raw);
            }
            (PropertyType::Text, Literal::Text(s)) => Some(Value::Text(s)),
            (PropertyType::Text, Literal::Int(i)) => Some(Value::Text(i.to_string())),
            (PropertyType::Text, Literal::Float(f)) => Some(Value::Text(f.to_string())),

            (PropertyType::Int, Literal::Int(i)) => Some(Value::Int(i)),
            (PropertyType::Int, Literal::Text(s)) => s.trim().parse().ok().map(Value::Int),

            (PropertyType::Float, Literal::Int(i)) => Some(Value::Float(i as f64)),
            (PropertyType::Float, Literal::Float(f)) => Some(Value::Float(f)),
            (PropertyType::Float, Literal::Text(s)) => s.trim().parse().ok().map(Value::Float),

            (PropertyType::Bool, Literal::Text(s)) => match s.to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            (PropertyType::Bool, Literal::Typed(Value::Bool(b))) => Some(Value::Bool(b)),

            (PropertyType::Date, Literal::Text(s)) => parse_date(&s).map(Value::Date),
            (PropertyType::Date, Literal::Typed(Value::Date(d))) => Some(Value::Date(d)),
            (PropertyType::Date, Literal::Typed(Value::DateTime(dt))) => Some(Value::Date(dt.date())),

            (PropertyType::DateTime, Literal::Text(s)) => parse_date_time(&s).map(Value::DateTime),
            (PropertyType::DateTime, Literal::Typed(Value::DateTime(dt))) => Some(Value::DateTime(dt)),
            (PropertyType::DateTime, Literal::Typed(Value::Date(d))) => {
                Some(Value::DateTime(d.and_time(chrono::NaiveTime::MIN)))
            }

            (PropertyType::Enum(e), Literal::Text(s)) => {
                if e.has_constant(&s) {
                    Some(Value::Enum(s))
                } else {
                    return Err(self.error(
                        raw,
                        target,
                        format!("expected one of {}", e.constants.join(", ")),
                    ));
                }
            }
            (PropertyType::Enum(e), Literal::Typed(Value::Enum(s))) if e.has_constant(&s) => {
                Some(Value::Enum(s))
            }

            (PropertyType::Entity(entity), Literal::Typed(Value::Ref(r))) if &r.entity == entity => {
                Some(Value::Ref(r))
            }
            (PropertyType::Entity(entity), literal) => {
                let id_type = self.registry.id_type(entity).ok_or_else(|| {
                    self.error(raw, target, format!("unknown entity type {}", entity))
                })?;
                let id = self.convert(literal, id_type, raw)?;
                Some(Value::Ref(EntityRef {
                    entity: entity.clone(),
                    id: Box::new(id),
                }))
            }

            _ => None,
        };
        converted.ok_or_else(|| self.error(raw, target, "value does not convert"))
    }

    fn error(&self, raw: impl Into<String>, target: &PropertyType, message: impl Into<String>) -> PrepareError {
        PrepareError::type_coercion(self.property.clone(), raw, target.to_string(), message)
    }
}
