//! Compilation of Prepared Queries into criteria.

use super::{ColumnMapping, Criteria, EntityMapping, Join, JoinKind, Mappings, Restriction, Source, SqlValue, SubQuery};
use crate::{QueryError, QueryResult};
use eql_core::{
    require_strategy, Condition, Direction, Operator, Order, PathSegment, Predicate, PreparedQuery,
    PropertyPath, Strategy, Value,
};
use std::collections::HashMap;

/// Builds [`Criteria`] for queries on one entity type.
pub struct CriteriaBuilder<'m> {
    mappings: &'m Mappings,
    aliases: usize,
}

/// The tables visible to a restriction: a root table and the joins made so far.
struct Scope<'m> {
    mapping: &'m EntityMapping,
    source: Source,
    /// Join aliases keyed by the association path they follow.
    joined: HashMap<String, (String, &'m EntityMapping)>,
}

/// A table column holding the elements of a multi-valued property.
struct Elements<'m> {
    source: Source,
    inner: String,
    /// Column holding the element (value or target id).
    element: String,
    /// Alias and mapping of the target entity, for navigation.
    target: Option<(String, &'m EntityMapping)>,
}

impl<'m> CriteriaBuilder<'m> {
    pub fn new(mappings: &'m Mappings) -> Self {
        Self { mappings, aliases: 0 }
    }

    pub fn build(&mut self, entity: &str, query: &PreparedQuery) -> QueryResult<Criteria> {
        let mut scope = self.scope(entity)?;
        let restriction = match &query.predicate {
            Some(predicate) => Some(self.predicate(&mut scope, predicate)?),
            None => None,
        };
        let orders = query
            .orders
            .iter()
            .map(|order| self.order(&mut scope, order))
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(Criteria {
            source: scope.source,
            restriction,
            orders,
            limit: None,
        })
    }

    fn alias(&mut self, prefix: char) -> String {
        let alias = format!("{}{}", prefix, self.aliases);
        self.aliases += 1;
        alias
    }

    fn entity(&self, name: &str) -> QueryResult<&'m EntityMapping> {
        self.mappings
            .entity(name)
            .ok_or_else(|| QueryError::mapping(name, "", "entity type has no table"))
    }

    fn scope(&mut self, entity: &str) -> QueryResult<Scope<'m>> {
        let mapping = self.entity(entity)?;
        let alias = self.alias('t');
        Ok(Scope {
            mapping,
            source: Source::new(mapping.table.clone(), alias),
            joined: HashMap::new(),
        })
    }

    fn predicate(&mut self, scope: &mut Scope<'m>, predicate: &Predicate<Condition>) -> QueryResult<Restriction> {
        Ok(match predicate {
            Predicate::Condition(condition) => self.condition(scope, condition)?,
            Predicate::And(children) => Restriction::And(
                children
                    .iter()
                    .map(|c| self.predicate(scope, c))
                    .collect::<QueryResult<_>>()?,
            ),
            Predicate::Or(children) => Restriction::Or(
                children
                    .iter()
                    .map(|c| self.predicate(scope, c))
                    .collect::<QueryResult<_>>()?,
            ),
        })
    }

    fn condition(&mut self, scope: &mut Scope<'m>, condition: &Condition) -> QueryResult<Restriction> {
        let strategy = require_strategy(condition.operator, condition.property.kind())?;
        let root = (scope.source.alias.clone(), scope.mapping);
        self.along(
            scope,
            root,
            String::new(),
            &condition.property.parents,
            &condition.property.leaf,
            strategy,
            &condition.operands,
        )
    }

    /// Follow association hops from `(alias, mapping)`: single-valued hops
    /// join into `scope`, a multi-valued hop opens an `EXISTS` sub-select.
    #[allow(clippy::too_many_arguments)]
    fn along(
        &mut self,
        scope: &mut Scope<'m>,
        (alias, mapping): (String, &'m EntityMapping),
        key: String,
        hops: &[PathSegment],
        leaf: &PathSegment,
        strategy: Strategy,
        operands: &[Value],
    ) -> QueryResult<Restriction> {
        let Some((hop, rest)) = hops.split_first() else {
            return self.leaf(&alias, mapping, leaf, strategy, operands);
        };
        let column = mapping
            .property(&hop.name)
            .ok_or_else(|| QueryError::mapping(&mapping.entity, &hop.name, "property is not mapped"))?;

        if hop.indexed {
            let elements = self.elements(mapping, &hop.name, column)?;
            let Some(target) = elements.target.clone() else {
                return Err(QueryError::mapping(&mapping.entity, &hop.name, "elements have no properties"));
            };
            let mut inner = Scope {
                mapping: target.1,
                source: elements.source,
                joined: HashMap::new(),
            };
            let restriction = self.along(&mut inner, target, String::new(), rest, leaf, strategy, operands)?;
            return Ok(Restriction::Exists {
                subquery: Box::new(SubQuery {
                    source: inner.source,
                    inner: elements.inner,
                    outer: format!("{}.{}", alias, mapping.id_column),
                    restriction: Some(restriction),
                }),
                negated: false,
            });
        }

        let ColumnMapping::ManyToOne { column, target } = column else {
            return Err(QueryError::mapping(&mapping.entity, &hop.name, "not a single-valued association"));
        };
        let key = if key.is_empty() {
            hop.name.clone()
        } else {
            format!("{}.{}", key, hop.name)
        };
        let next = self.join(scope, &key, &alias, column, target, hop.nullable)?;
        self.along(scope, next, key, rest, leaf, strategy, operands)
    }

    fn join(
        &mut self,
        scope: &mut Scope<'m>,
        key: &str,
        owner: &str,
        column: &str,
        target: &str,
        nullable: bool,
    ) -> QueryResult<(String, &'m EntityMapping)> {
        if let Some(existing) = scope.joined.get(key) {
            return Ok(existing.clone());
        }
        let mapping = self.entity(target)?;
        let alias = self.alias('t');
        scope.source.joins.push(Join {
            kind: if nullable { JoinKind::Left } else { JoinKind::Inner },
            table: mapping.table.clone(),
            alias: alias.clone(),
            column: mapping.id_column.clone(),
            owner_column: format!("{}.{}", owner, column),
        });
        scope.joined.insert(key.to_string(), (alias.clone(), mapping));
        Ok((alias, mapping))
    }

    /// The rows holding the elements of a multi-valued property.
    fn elements(
        &mut self,
        mapping: &'m EntityMapping,
        property: &str,
        column: &ColumnMapping,
    ) -> QueryResult<Elements<'m>> {
        Ok(match column {
            ColumnMapping::OneToMany { target, mapped_by } => {
                let target = self.entity(target)?;
                let inner_alias = self.alias('t');
                Elements {
                    source: Source::new(target.table.clone(), inner_alias.clone()),
                    inner: format!("{}.{}", inner_alias, mapped_by),
                    element: format!("{}.{}", inner_alias, target.id_column),
                    target: Some((inner_alias, target)),
                }
            }
            ColumnMapping::ManyToMany {
                join_table,
                owner_column,
                target_column,
                target,
            } => {
                let target = self.entity(target)?;
                let link = self.alias('j');
                let target_alias = self.alias('t');
                let mut source = Source::new(join_table.clone(), link.clone());
                source.joins.push(Join {
                    kind: JoinKind::Inner,
                    table: target.table.clone(),
                    alias: target_alias.clone(),
                    column: target.id_column.clone(),
                    owner_column: format!("{}.{}", link, target_column),
                });
                Elements {
                    source,
                    inner: format!("{}.{}", link, owner_column),
                    element: format!("{}.{}", link, target_column),
                    target: Some((target_alias, target)),
                }
            }
            ColumnMapping::ElementCollection {
                table,
                owner_column,
                value_column,
            } => {
                let values = self.alias('e');
                Elements {
                    source: Source::new(table.clone(), values.clone()),
                    inner: format!("{}.{}", values, owner_column),
                    element: format!("{}.{}", values, value_column),
                    target: None,
                }
            }
            _ => {
                return Err(QueryError::mapping(&mapping.entity, property, "not a multi-valued property"));
            }
        })
    }

    fn leaf(
        &mut self,
        alias: &str,
        mapping: &'m EntityMapping,
        leaf: &PathSegment,
        strategy: Strategy,
        operands: &[Value],
    ) -> QueryResult<Restriction> {
        let column = mapping
            .property(&leaf.name)
            .ok_or_else(|| QueryError::mapping(&mapping.entity, &leaf.name, "property is not mapped"))?;

        match column {
            ColumnMapping::Column(name) | ColumnMapping::ManyToOne { column: name, .. } => {
                scalar(format!("{}.{}", alias, name), strategy, operands)
                    .ok_or_else(|| QueryError::mapping(&mapping.entity, &leaf.name, "operator needs a collection"))
            }
            collection => {
                let elements = self.elements(mapping, &leaf.name, collection)?;
                let (restriction, negated) = match strategy {
                    Strategy::Emptiness { negated } => (None, !negated),
                    Strategy::Containment { negated } => (
                        Some(Restriction::Compare {
                            column: elements.element,
                            operator: "=",
                            value: first(operands),
                        }),
                        negated,
                    ),
                    _ => {
                        return Err(QueryError::mapping(
                            &mapping.entity,
                            &leaf.name,
                            "operator needs a single value",
                        ))
                    }
                };
                // Sub-select only the link rows; the target table is not needed.
                let mut source = elements.source;
                source.joins.clear();
                Ok(Restriction::Exists {
                    subquery: Box::new(SubQuery {
                        source,
                        inner: elements.inner,
                        outer: format!("{}.{}", alias, mapping.id_column),
                        restriction,
                    }),
                    negated,
                })
            }
        }
    }

    fn order(&mut self, scope: &mut Scope<'m>, order: &Order<PropertyPath>) -> QueryResult<(String, Direction)> {
        let mut current = (scope.source.alias.clone(), scope.mapping);
        let mut key = String::new();
        for hop in &order.property.parents {
            let column = current
                .1
                .property(&hop.name)
                .ok_or_else(|| QueryError::mapping(&current.1.entity, &hop.name, "property is not mapped"))?;
            let ColumnMapping::ManyToOne { column, target } = column else {
                return Err(QueryError::mapping(&current.1.entity, &hop.name, "cannot sort across this association"));
            };
            key = if key.is_empty() {
                hop.name.clone()
            } else {
                format!("{}.{}", key, hop.name)
            };
            current = self.join(scope, &key, &current.0, column, target, hop.nullable)?;
        }

        let (alias, mapping) = current;
        let leaf = &order.property.leaf;
        match mapping.property(&leaf.name) {
            Some(ColumnMapping::Column(name)) | Some(ColumnMapping::ManyToOne { column: name, .. }) => {
                Ok((format!("{}.{}", alias, name), order.direction))
            }
            _ => Err(QueryError::mapping(&mapping.entity, &leaf.name, "no column to sort on")),
        }
    }
}

fn first(operands: &[Value]) -> SqlValue {
    operands.first().map(SqlValue::from).unwrap_or(SqlValue::Null)
}

/// The restriction on a single column, or `None` for collection strategies.
fn scalar(column: String, strategy: Strategy, operands: &[Value]) -> Option<Restriction> {
    Some(match strategy {
        Strategy::Equality { negated } => Restriction::Compare {
            column,
            operator: if negated { "<>" } else { "=" },
            value: first(operands),
        },
        Strategy::Ordering(operator) => Restriction::Compare {
            column,
            operator: match operator {
                Operator::Gt => ">",
                Operator::Ge => ">=",
                Operator::Lt => "<",
                _ => "<=",
            },
            value: first(operands),
        },
        Strategy::Pattern {
            case_insensitive,
            negated,
        } => Restriction::Like {
            column,
            pattern: first(operands),
            case_insensitive,
            negated,
        },
        Strategy::Membership { negated } => Restriction::In {
            column,
            values: operands.iter().map(SqlValue::from).collect(),
            negated,
        },
        Strategy::Nullness { negated } => Restriction::Null { column, negated },
        Strategy::Emptiness { .. } | Strategy::Containment { .. } => return None,
    })
}
