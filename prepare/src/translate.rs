//! Built-in rewrites applied to every prepared condition.
//!
//! Each rewrite returns `None` when it does not apply. They run in the order
//! of [`BUILT_INS`], before the property's own translator.

use eql_core::{escape_like, Condition, Operator, Predicate, PropertyKind, Value};

pub(crate) type BuiltIn = fn(&Condition) -> Option<Predicate<Condition>>;

pub(crate) const BUILT_INS: [BuiltIn; 6] = [
    absence_operators,
    null_comparison,
    null_in_list,
    contains_list,
    text_contains,
    empty_text,
];

fn leaf(condition: Condition) -> Predicate<Condition> {
    Predicate::Condition(condition)
}

/// `is empty` on a scalar means `is null`; `is null` on a collection means `is empty`.
pub(crate) fn absence_operators(condition: &Condition) -> Option<Predicate<Condition>> {
    let collection = condition.property.kind() == PropertyKind::Collection;
    let operator = match (condition.operator, collection) {
        (Operator::IsEmpty, false) => Operator::IsNull,
        (Operator::IsNotEmpty, false) => Operator::IsNotNull,
        (Operator::IsNull, true) => Operator::IsEmpty,
        (Operator::IsNotNull, true) => Operator::IsNotEmpty,
        _ => return None,
    };
    Some(leaf(condition.with(operator, Vec::new())))
}

/// `= null` means `is null`, `!= null` means `is not null`.
pub(crate) fn null_comparison(condition: &Condition) -> Option<Predicate<Condition>> {
    let operator = match (condition.operator, condition.operands.as_slice()) {
        (Operator::Eq, [Value::Null]) => Operator::IsNull,
        (Operator::Neq, [Value::Null]) => Operator::IsNotNull,
        _ => return None,
    };
    Some(leaf(condition.with(operator, Vec::new())))
}

/// `in (null, a)` means `is null or in (a)`; `not in (null, a)` means
/// `is not null and not in (a)`.
pub(crate) fn null_in_list(condition: &Condition) -> Option<Predicate<Condition>> {
    if !condition.operator.takes_list() || !condition.operands.iter().any(Value::is_null) {
        return None;
    }
    let values: Vec<Value> = condition
        .operands
        .iter()
        .filter(|v| !v.is_null())
        .cloned()
        .collect();
    let negated = condition.operator == Operator::NotIn;

    let mut parts = vec![leaf(condition.with(
        if negated {
            Operator::IsNotNull
        } else {
            Operator::IsNull
        },
        Vec::new(),
    ))];
    if !values.is_empty() {
        parts.push(leaf(condition.with(condition.operator, values)));
    }
    Some(if negated {
        Predicate::all_of(parts)
    } else {
        Predicate::any_of(parts)
    })
}

/// `contains (a, b)` means `contains a or contains b`; `not contains (a, b)`
/// means `not contains a and not contains b`. A null element stands for
/// `is empty` (`is not empty` when negated).
pub(crate) fn contains_list(condition: &Condition) -> Option<Predicate<Condition>> {
    let negated = match condition.operator {
        Operator::Contains => false,
        Operator::NotContains => true,
        _ => return None,
    };
    if let [single] = condition.operands.as_slice() {
        if !single.is_null() {
            return None;
        }
    }
    let parts = condition.operands.iter().map(|value| {
        leaf(match (value.is_null(), negated) {
            (true, false) => condition.with(Operator::IsEmpty, Vec::new()),
            (true, true) => condition.with(Operator::IsNotEmpty, Vec::new()),
            (false, _) => condition.with(condition.operator, vec![value.clone()]),
        })
    });
    Some(if negated {
        Predicate::all_of(parts)
    } else {
        Predicate::any_of(parts)
    })
}

/// On text, `contains 'x'` means `like '%x%'` with `x` taken literally.
pub(crate) fn text_contains(condition: &Condition) -> Option<Predicate<Condition>> {
    let operator = match condition.operator {
        Operator::Contains => Operator::Like,
        Operator::NotContains => Operator::NotLike,
        _ => return None,
    };
    if condition.property.kind() != PropertyKind::Text {
        return None;
    }
    let text = condition.operand()?.as_str()?;
    let pattern = format!("%{}%", escape_like(text));
    Some(leaf(condition.with(operator, vec![Value::Text(pattern)])))
}

/// On text, an empty string and a null value are the same: `= ''` means
/// `is null or = ''`, `!= ''` means `is not null and != ''`.
pub(crate) fn empty_text(condition: &Condition) -> Option<Predicate<Condition>> {
    if condition.property.kind() != PropertyKind::Text {
        return None;
    }
    if condition.operand().and_then(Value::as_str) != Some("") {
        return None;
    }
    match condition.operator {
        Operator::Eq => Some(Predicate::any_of([
            leaf(condition.with(Operator::IsNull, Vec::new())),
            leaf(condition.clone()),
        ])),
        Operator::Neq => Some(Predicate::all_of([
            leaf(condition.with(Operator::IsNotNull, Vec::new())),
            leaf(condition.clone()),
        ])),
        _ => None,
    }
}
