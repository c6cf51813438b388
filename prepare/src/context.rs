//! Request context for function resolution.

use chrono::{Local, NaiveDateTime};

/// Inputs of `today()`, `now()` and `currentUser()`.
///
/// Function values are resolved once, when the query is prepared, so a
/// Prepared Query keeps the values of the context it was prepared with.
/// Time-sensitive queries should be prepared again per call.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext {
    pub now: NaiveDateTime,
    pub principal: Option<String>,
}

impl QueryContext {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            principal: None,
        }
    }

    /// Context at the local wall-clock time, without principal.
    pub fn at_local_time() -> Self {
        Self::new(Local::now().naive_local())
    }

    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::at_local_time()
    }
}
