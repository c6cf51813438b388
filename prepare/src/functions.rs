//! Resolution of function operands.

use crate::{PrepareError, PrepareResult, QueryContext};
use chrono::NaiveTime;
use eql_core::{PropertyType, Value};
use eql_parser::Function;

/// Resolve `function` for a property of type `target`.
///
/// `currentUser()` yields the principal name, converted to the property type
/// with `coerce_text`.
pub(crate) fn resolve(
    function: Function,
    target: &PropertyType,
    context: &QueryContext,
    property: &str,
    coerce_text: impl Fn(String) -> PrepareResult<Value>,
) -> PrepareResult<Value> {
    match function {
        Function::Today | Function::Now => {
            let now = context.now;
            match target {
                PropertyType::Date => Ok(Value::Date(now.date())),
                PropertyType::DateTime if function == Function::Today => {
                    Ok(Value::DateTime(now.date().and_time(NaiveTime::MIN)))
                }
                PropertyType::DateTime => Ok(Value::DateTime(now)),
                other => Err(PrepareError::function_resolution(
                    function.to_string(),
                    property,
                    format!("a date is not comparable with {}", other),
                )),
            }
        }
        Function::CurrentUser => {
            let principal = context.principal.clone().ok_or_else(|| {
                PrepareError::function_resolution(
                    function.to_string(),
                    property,
                    "no authenticated principal",
                )
            })?;
            coerce_text(principal)
        }
    }
}
