//! The query tree shared by raw and prepared queries.
//!
//! A query is an optional predicate plus an ordered list of sort clauses.
//! The tree is generic over the condition type `C` and the sort property type
//! `P`, so the parser and the preparer share one structure.

use std::fmt;

/// A predicate tree of conditions joined by AND/OR.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<C> {
    Condition(C),
    And(Vec<Predicate<C>>),
    Or(Vec<Predicate<C>>),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

/// A sort clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Order<P> {
    pub property: P,
    pub direction: Direction,
}

/// A query: optional predicate and sort clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Query<C, P> {
    pub predicate: Option<Predicate<C>>,
    pub orders: Vec<Order<P>>,
}

impl<C> Predicate<C> {
    /// Conjunction of the given predicates, flattening nested ANDs.
    /// A single predicate is returned unwrapped.
    pub fn all_of(items: impl IntoIterator<Item = Predicate<C>>) -> Self {
        Self::junction(items, true)
    }

    /// Disjunction of the given predicates, flattening nested ORs.
    pub fn any_of(items: impl IntoIterator<Item = Predicate<C>>) -> Self {
        Self::junction(items, false)
    }

    fn junction(items: impl IntoIterator<Item = Predicate<C>>, and: bool) -> Self {
        let mut flat = Vec::new();
        for item in items {
            match item {
                Predicate::And(children) if and => flat.extend(children),
                Predicate::Or(children) if !and => flat.extend(children),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            if let Some(single) = flat.pop() {
                return single;
            }
        }
        if and {
            Predicate::And(flat)
        } else {
            Predicate::Or(flat)
        }
    }

    /// All conditions in the tree, left to right.
    pub fn conditions(&self) -> Vec<&C> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a C>) {
        match self {
            Predicate::Condition(c) => out.push(c),
            Predicate::And(children) | Predicate::Or(children) => {
                for child in children {
                    child.collect_conditions(out);
                }
            }
        }
    }

    /// Replace every condition by a predicate, keeping the junction structure.
    pub fn try_map<D, E>(
        self,
        f: &mut impl FnMut(C) -> Result<Predicate<D>, E>,
    ) -> Result<Predicate<D>, E> {
        match self {
            Predicate::Condition(c) => f(c),
            Predicate::And(children) => Ok(Predicate::all_of(
                children
                    .into_iter()
                    .map(|child| child.try_map(f))
                    .collect::<Result<Vec<_>, E>>()?,
            )),
            Predicate::Or(children) => Ok(Predicate::any_of(
                children
                    .into_iter()
                    .map(|child| child.try_map(f))
                    .collect::<Result<Vec<_>, E>>()?,
            )),
        }
    }
}

impl<P> Order<P> {
    pub fn new(property: P, direction: Direction) -> Self {
        Self {
            property,
            direction,
        }
    }

    pub fn asc(property: P) -> Self {
        Self::new(property, Direction::Asc)
    }

    pub fn desc(property: P) -> Self {
        Self::new(property, Direction::Desc)
    }
}

impl<C, P> Default for Query<C, P> {
    fn default() -> Self {
        Self {
            predicate: None,
            orders: Vec::new(),
        }
    }
}

impl<C, P> Query<C, P> {
    /// Query matching everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(predicate: Predicate<C>) -> Self {
        Self {
            predicate: Some(predicate),
            orders: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: Order<P>) -> Self {
        self.orders.push(order);
        self
    }

    /// Combine with another query by AND. The sort of `self` wins unless empty.
    pub fn and(self, other: Query<C, P>) -> Self {
        self.combine(other, true)
    }

    /// Combine with another query by OR. The sort of `self` wins unless empty.
    pub fn or(self, other: Query<C, P>) -> Self {
        self.combine(other, false)
    }

    fn combine(self, other: Query<C, P>, and: bool) -> Self {
        let predicate = match (self.predicate, other.predicate) {
            (Some(a), Some(b)) if and => Some(Predicate::all_of([a, b])),
            (Some(a), Some(b)) => Some(Predicate::any_of([a, b])),
            // Either side matching everything makes the OR match everything.
            (a, b) if !and => a.and(b),
            (a, b) => a.or(b),
        };
        let orders = if self.orders.is_empty() {
            other.orders
        } else {
            self.orders
        };
        Self { predicate, orders }
    }
}

fn fmt_predicate<C: fmt::Display>(
    predicate: &Predicate<C>,
    nested: bool,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let (children, separator) = match predicate {
        Predicate::Condition(c) => return write!(f, "{}", c),
        Predicate::And(children) => (children, " and "),
        Predicate::Or(children) => (children, " or "),
    };
    if nested {
        write!(f, "(")?;
    }
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        fmt_predicate(child, true, f)?;
    }
    if nested {
        write!(f, ")")?;
    }
    Ok(())
}

impl<C: fmt::Display> fmt::Display for Predicate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_predicate(self, false, f)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => write!(f, "ASC"),
            Direction::Desc => write!(f, "DESC"),
        }
    }
}

/// Renders the query as EQL text.
impl<C: fmt::Display, P: fmt::Display> fmt::Display for Query<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(predicate) = &self.predicate {
            write!(f, "{}", predicate)?;
        }
        if !self.orders.is_empty() {
            if self.predicate.is_some() {
                write!(f, " ")?;
            }
            write!(f, "order by ")?;
            for (i, order) in self.orders.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} {}", order.property, order.direction)?;
            }
        }
        Ok(())
    }
}
