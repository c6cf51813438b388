//! The `(Operator, PropertyKind)` strategy table.
//!
//! Every legal operator/kind pair maps to one comparison strategy. The
//! preparer rejects pairs without a strategy; the in-memory backends evaluate
//! conditions through [`Matcher`], and the relational backend renders one SQL
//! form per strategy.

use crate::{CoreError, CoreResult, LikePattern, Operator, PropertyKind, Value};
use std::cmp::Ordering;

/// How a condition compares a property value with its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `=` / `!=`
    Equality { negated: bool },
    /// `>`, `>=`, `<`, `<=`
    Ordering(Operator),
    /// `like`, `ilike` and their negations.
    Pattern { case_insensitive: bool, negated: bool },
    /// `in` / `not in`
    Membership { negated: bool },
    /// `is null` / `is not null`
    Nullness { negated: bool },
    /// `is empty` / `is not empty` on collections.
    Emptiness { negated: bool },
    /// `contains` / `not contains` on collections.
    Containment { negated: bool },
}

/// Look up the strategy for an operator applied to a kind of property.
pub fn strategy(operator: Operator, kind: PropertyKind) -> Option<Strategy> {
    use Operator as Op;
    use PropertyKind as K;

    let scalar = kind != K::Collection;
    let ordered = matches!(kind, K::Text | K::Number | K::Temporal);

    let strategy = match operator {
        Op::Eq | Op::Neq if scalar => Strategy::Equality {
            negated: operator == Op::Neq,
        },
        Op::Gt | Op::Ge | Op::Lt | Op::Le if ordered => Strategy::Ordering(operator),
        Op::Like | Op::NotLike | Op::ILike | Op::NotILike if kind == K::Text => Strategy::Pattern {
            case_insensitive: matches!(operator, Op::ILike | Op::NotILike),
            negated: operator.is_negation(),
        },
        Op::In | Op::NotIn if scalar => Strategy::Membership {
            negated: operator == Op::NotIn,
        },
        Op::IsNull | Op::IsNotNull if scalar => Strategy::Nullness {
            negated: operator == Op::IsNotNull,
        },
        Op::IsEmpty | Op::IsNotEmpty if !scalar => Strategy::Emptiness {
            negated: operator == Op::IsNotEmpty,
        },
        Op::Contains | Op::NotContains if !scalar => Strategy::Containment {
            negated: operator == Op::NotContains,
        },
        _ => return None,
    };
    Some(strategy)
}

/// Like [`strategy`], failing for pairs without a strategy.
pub fn require_strategy(operator: Operator, kind: PropertyKind) -> CoreResult<Strategy> {
    strategy(operator, kind).ok_or_else(|| CoreError::UnsupportedOperator {
        operator: operator.to_string(),
        kind: format!("{:?}", kind).to_lowercase(),
    })
}

impl Strategy {
    /// Whether the strategy is decided on null values too. All other
    /// strategies never match a null value.
    pub fn tests_absence(&self) -> bool {
        matches!(self, Strategy::Nullness { .. } | Strategy::Emptiness { .. })
    }
}

/// A strategy bound to its operands, ready to test values.
#[derive(Debug, Clone)]
pub struct Matcher {
    strategy: Strategy,
    operands: Vec<Value>,
    pattern: Option<LikePattern>,
}

impl Matcher {
    pub fn new(strategy: Strategy, operands: Vec<Value>) -> CoreResult<Self> {
        let expected = match strategy {
            Strategy::Nullness { .. } | Strategy::Emptiness { .. } => Some(0),
            Strategy::Membership { .. } => None,
            _ => Some(1),
        };
        if let Some(expected) = expected {
            if operands.len() != expected {
                return Err(CoreError::OperandCount {
                    operator: format!("{:?}", strategy),
                    expected: expected.to_string(),
                    actual: operands.len(),
                });
            }
        }
        let pattern = match strategy {
            Strategy::Pattern {
                case_insensitive, ..
            } => {
                let text = operands.first().and_then(Value::as_str).unwrap_or_default();
                Some(LikePattern::compile(text, case_insensitive)?)
            }
            _ => None,
        };
        Ok(Self {
            strategy,
            operands,
            pattern,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Test a single property value.
    pub fn matches(&self, value: &Value) -> bool {
        match self.strategy {
            Strategy::Nullness { negated } => value.is_null() != negated,
            Strategy::Emptiness { negated } => {
                let empty = match value {
                    Value::Null => true,
                    Value::List(items) => items.is_empty(),
                    _ => false,
                };
                empty != negated
            }
            _ if value.is_null() => false,
            Strategy::Equality { negated } => value.matches(&self.operands[0]) != negated,
            Strategy::Ordering(op) => match value.compare(&self.operands[0]) {
                Some(ordering) => match op {
                    Operator::Gt => ordering == Ordering::Greater,
                    Operator::Ge => ordering != Ordering::Less,
                    Operator::Lt => ordering == Ordering::Less,
                    _ => ordering != Ordering::Greater,
                },
                None => false,
            },
            Strategy::Pattern { negated, .. } => match (value.as_str(), &self.pattern) {
                (Some(text), Some(pattern)) => pattern.is_match(text) != negated,
                _ => false,
            },
            Strategy::Membership { negated } => {
                self.operands.iter().any(|o| value.matches(o)) != negated
            }
            Strategy::Containment { negated } => match value {
                Value::List(items) => items.iter().any(|i| i.matches(&self.operands[0])) != negated,
                _ => false,
            },
        }
    }
}
