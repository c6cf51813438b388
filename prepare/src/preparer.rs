//! The Query Preparer.

use crate::coerce::Coercer;
use crate::translate::BUILT_INS;
use crate::{EqlError, PrepareError, PrepareResult, QueryContext};
use eql_core::{
    check_like_pattern, strategy, Condition, Order, Predicate, PreparedQuery, PropertyPath,
    Strategy, Value,
};
use eql_parser::{parse_query, Operand, RawCondition, RawQuery};
use eql_registry::{EntityDef, Registry, TranslationContext};
use std::sync::Arc;

/// Maximum number of nested rewrites of a single condition.
pub const MAX_TRANSLATION_DEPTH: usize = 50;

/// Prepares queries for the entity types of one registry.
#[derive(Debug, Clone)]
pub struct Preparer {
    registry: Arc<Registry>,
}

/// Something that can be prepared: an Abstract Query, or an already
/// Prepared Query (which prepares to itself).
pub trait Preparable {
    fn prepare_with(
        &self,
        preparer: &Preparer,
        entity: &EntityDef,
        context: &QueryContext,
    ) -> PrepareResult<PreparedQuery>;
}

impl Preparer {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prepare `query` for `entity`.
    pub fn prepare<Q: Preparable + ?Sized>(
        &self,
        entity: &str,
        query: &Q,
        context: &QueryContext,
    ) -> PrepareResult<PreparedQuery> {
        let entity_def = self.entity(entity)?;
        let prepared = query.prepare_with(self, entity_def, context)?;
        log::debug!("prepared {} query: {}", entity, prepared);
        Ok(prepared)
    }

    /// Parse and prepare EQL text for `entity`.
    pub fn parse(&self, entity: &str, text: &str, context: &QueryContext) -> Result<PreparedQuery, EqlError> {
        let raw = parse_query(text)?;
        Ok(self.prepare(entity, &raw, context)?)
    }

    fn entity(&self, name: &str) -> PrepareResult<&EntityDef> {
        self.registry
            .entity(name)
            .ok_or_else(|| PrepareError::UnknownEntity(name.to_string()))
    }

    // ==================== CONDITIONS ====================

    fn prepare_condition(
        &self,
        entity: &EntityDef,
        raw: RawCondition,
        context: &QueryContext,
    ) -> PrepareResult<Predicate<Condition>> {
        let resolved = self.registry.resolve(&entity.name, &raw.property)?;
        let path = resolved.path;
        let property = path.name();
        let target = path.property_type().clone();
        let coercer = Coercer::new(&self.registry, context, property.clone());

        let operands = match (raw.operand, raw.operator.is_unary()) {
            (None, true) => Vec::new(),
            (Some(operand), true) => {
                return Err(PrepareError::type_coercion(
                    property,
                    operand.to_string(),
                    target.to_string(),
                    format!("'{}' takes no operand", raw.operator),
                ))
            }
            (None, false) => {
                return Err(PrepareError::type_coercion(
                    property,
                    "nothing",
                    target.to_string(),
                    format!("'{}' needs an operand", raw.operator),
                ))
            }
            (Some(Operand::List(items)), false) if raw.operator.accepts_list() => items
                .iter()
                .map(|item| coercer.coerce(item, &target))
                .collect::<PrepareResult<Vec<_>>>()?,
            (Some(operand @ Operand::List(_)), false) => {
                return Err(PrepareError::type_coercion(
                    property,
                    operand.to_string(),
                    target.to_string(),
                    format!("'{}' does not take a list", raw.operator),
                ))
            }
            (Some(operand), false) => vec![coercer.coerce(&operand, &target)?],
        };

        let condition = Condition::new(path, raw.operator, operands);
        self.translate(entity, condition, 0, 0)
    }

    /// Run the rewrite stages from `stage` on, to a fixpoint.
    ///
    /// Stages are the built-in rewrites followed by the property's translator.
    /// When a stage changes the condition, every resulting condition is
    /// translated again from the first stage, except a copy of the input
    /// itself, which continues with the next stage.
    fn translate(
        &self,
        entity: &EntityDef,
        condition: Condition,
        stage: usize,
        depth: usize,
    ) -> PrepareResult<Predicate<Condition>> {
        if depth > MAX_TRANSLATION_DEPTH {
            return Err(PrepareError::TranslationDepthExceeded {
                property: condition.property.name(),
                limit: MAX_TRANSLATION_DEPTH,
            });
        }

        for current in stage..=BUILT_INS.len() {
            let rewritten = match BUILT_INS.get(current) {
                Some(built_in) => built_in(&condition),
                None => self.apply_property_translator(entity, &condition)?,
            };
            let Some(rewritten) = rewritten else {
                continue;
            };
            if rewritten == Predicate::Condition(condition.clone()) {
                continue;
            }

            log::trace!("rewrote '{}' into '{}'", condition, rewritten);
            return rewritten.try_map(&mut |leaf| {
                if leaf == condition {
                    self.translate(entity, leaf, current + 1, depth + 1)
                } else {
                    self.translate(entity, leaf, 0, depth + 1)
                }
            });
        }

        self.validate(&condition)?;
        Ok(Predicate::Condition(condition))
    }

    fn apply_property_translator(
        &self,
        entity: &EntityDef,
        condition: &Condition,
    ) -> PrepareResult<Option<Predicate<Condition>>> {
        let owner = &condition.property.leaf.owner;
        let translator = self
            .registry
            .entity(owner)
            .and_then(|e| e.property(&condition.property.leaf.name))
            .and_then(|p| p.translator.as_ref());
        let Some(translator) = translator else {
            return Ok(None);
        };
        let context = TranslationContext::new(&self.registry, entity);
        Ok(Some(translator.translate(condition, &context)?))
    }

    /// Check that the final condition can be evaluated by every backend.
    fn validate(&self, condition: &Condition) -> PrepareResult<()> {
        let property = &condition.property;
        let Some(strategy) = strategy(condition.operator, property.kind()) else {
            return Err(PrepareError::InvalidOperator {
                property: property.name(),
                operator: condition.operator.to_string(),
                property_type: property.property_type().to_string(),
            });
        };

        let invalid = |message: &str| {
            Err(PrepareError::type_coercion(
                property.name(),
                Value::List(condition.operands.clone()).to_string(),
                property.property_type().to_string(),
                message,
            ))
        };

        match strategy {
            Strategy::Nullness { .. } | Strategy::Emptiness { .. } => Ok(()),
            Strategy::Membership { .. } => {
                if condition.operands.is_empty() {
                    invalid("the list of values is empty")
                } else if condition.operands.iter().any(Value::is_null) {
                    invalid("null in a list of values")
                } else {
                    Ok(())
                }
            }
            _ => match condition.operands.as_slice() {
                [Value::Null] => invalid("null cannot be compared"),
                [Value::Text(pattern)] if matches!(strategy, Strategy::Pattern { .. }) => {
                    check_like_pattern(pattern).or_else(|e| invalid(&e.to_string()))
                }
                [_] if matches!(strategy, Strategy::Pattern { .. }) => invalid("pattern must be text"),
                [_] => Ok(()),
                _ => invalid("expected a single value"),
            },
        }
    }

    // ==================== SORTING ====================

    fn prepare_order(&self, entity: &EntityDef, order: &Order<String>) -> PrepareResult<Order<PropertyPath>> {
        let resolved = self.registry.resolve(&entity.name, &order.property)?;
        check_sortable(&resolved.path)?;
        Ok(Order::new(resolved.path, order.direction))
    }

    /// Resolve an already-resolved path again, to verify it against this registry.
    fn revalidate(&self, entity: &EntityDef, path: &PropertyPath) -> PrepareResult<PropertyPath> {
        let resolved = self.registry.resolve(&entity.name, &path.name())?;
        if &resolved.path != path {
            return Err(PrepareError::InvalidPath {
                path: path.name(),
                message: "property metadata changed since preparation".to_string(),
            });
        }
        Ok(resolved.path)
    }
}

fn check_sortable(path: &PropertyPath) -> PrepareResult<()> {
    let message = if path.is_multi_valued() {
        "path traverses a multi-valued association"
    } else if path.property_type().is_collection() {
        "property is multi-valued"
    } else {
        return Ok(());
    };
    Err(PrepareError::UnsortableProperty {
        property: path.name(),
        message: message.to_string(),
    })
}

impl Preparable for RawQuery {
    fn prepare_with(
        &self,
        preparer: &Preparer,
        entity: &EntityDef,
        context: &QueryContext,
    ) -> PrepareResult<PreparedQuery> {
        let predicate = match self.predicate.clone() {
            Some(predicate) => Some(predicate.try_map(&mut |raw| {
                preparer.prepare_condition(entity, raw, context)
            })?),
            None => None,
        };
        let orders = self
            .orders
            .iter()
            .map(|order| preparer.prepare_order(entity, order))
            .collect::<PrepareResult<Vec<_>>>()?;
        Ok(PreparedQuery { predicate, orders })
    }
}

impl Preparable for PreparedQuery {
    fn prepare_with(
        &self,
        preparer: &Preparer,
        entity: &EntityDef,
        _context: &QueryContext,
    ) -> PrepareResult<PreparedQuery> {
        if let Some(predicate) = &self.predicate {
            for condition in predicate.conditions() {
                preparer.revalidate(entity, &condition.property)?;
                preparer.validate(condition)?;
            }
        }
        for order in &self.orders {
            let path = preparer.revalidate(entity, &order.property)?;
            check_sortable(&path)?;
        }
        Ok(self.clone())
    }
}
