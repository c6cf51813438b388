//! Condition translators.
//!
//! A translator is attached to a property and rewrites every prepared
//! condition on that property. It must be a pure function of the condition
//! and the metadata it can see through the [`TranslationContext`]. Returning
//! the condition unchanged means "nothing to do".

use crate::{EntityDef, Registry, ResolveError, TranslationError};
use eql_core::{escape_like, Condition, Operator, Predicate, PropertyPath, Value};
use std::fmt;

/// Metadata visible to a translator.
#[derive(Debug, Clone, Copy)]
pub struct TranslationContext<'a> {
    registry: &'a Registry,
    entity: &'a EntityDef,
}

impl<'a> TranslationContext<'a> {
    pub fn new(registry: &'a Registry, entity: &'a EntityDef) -> Self {
        Self { registry, entity }
    }

    /// The entity type the query targets.
    pub fn entity(&self) -> &EntityDef {
        self.entity
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    /// Resolve a path from the query's entity type.
    pub fn resolve(&self, path: &str) -> Result<PropertyPath, ResolveError> {
        Ok(self.registry.resolve(&self.entity.name, path)?.path)
    }

    /// Resolve `name` on the entity declaring the condition's property,
    /// keeping the association steps that lead there.
    pub fn sibling(&self, condition: &Condition, name: &str) -> Result<PropertyPath, ResolveError> {
        let resolved = self.registry.resolve(&condition.property.leaf.owner, name)?;
        let mut parents = condition.property.parents.clone();
        parents.extend(resolved.path.parents);
        Ok(PropertyPath::new(parents, resolved.path.leaf))
    }
}

/// Rewrites conditions on the property it is attached to.
pub trait ConditionTranslator: fmt::Debug + Send + Sync {
    fn translate(
        &self,
        condition: &Condition,
        context: &TranslationContext<'_>,
    ) -> Result<Predicate<Condition>, TranslationError>;
}

/// Makes text comparisons case-insensitive: `=` becomes `ilike` on the
/// escaped value, `!=` becomes `not ilike`, `like`/`not like` become
/// `ilike`/`not ilike`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreCase;

impl ConditionTranslator for IgnoreCase {
    fn translate(
        &self,
        condition: &Condition,
        _context: &TranslationContext<'_>,
    ) -> Result<Predicate<Condition>, TranslationError> {
        let text = condition.operand().and_then(Value::as_str);
        let translated = match (condition.operator, text) {
            (Operator::Eq, Some(text)) => {
                condition.with(Operator::ILike, vec![Value::Text(escape_like(text))])
            }
            (Operator::Neq, Some(text)) => {
                condition.with(Operator::NotILike, vec![Value::Text(escape_like(text))])
            }
            (Operator::Like, Some(_)) => condition.with(Operator::ILike, condition.operands.clone()),
            (Operator::NotLike, Some(_)) => {
                condition.with(Operator::NotILike, condition.operands.clone())
            }
            _ => condition.clone(),
        };
        Ok(Predicate::Condition(translated))
    }
}

/// Expands a (usually virtual) property into the same condition on several
/// other properties of the declaring entity: OR-ed for positive operators,
/// AND-ed for negated ones.
#[derive(Debug, Clone)]
pub struct ExpandProperties {
    properties: Vec<String>,
}

impl ExpandProperties {
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }
}

impl ConditionTranslator for ExpandProperties {
    fn translate(
        &self,
        condition: &Condition,
        context: &TranslationContext<'_>,
    ) -> Result<Predicate<Condition>, TranslationError> {
        if self.properties.is_empty() {
            return Err(TranslationError::Unsupported {
                condition: condition.to_string(),
                message: "no properties to expand into".to_string(),
            });
        }
        let expanded = self
            .properties
            .iter()
            .map(|name| {
                let path = context.sibling(condition, name)?;
                Ok(Predicate::Condition(Condition::new(
                    path,
                    condition.operator,
                    condition.operands.clone(),
                )))
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;

        Ok(if condition.operator.is_negation() {
            Predicate::all_of(expanded)
        } else {
            Predicate::any_of(expanded)
        })
    }
}
