//! Scenario definitions: queries with their expected outcome on every backend.

use eql_prepare::{EqlError, PrepareError, QueryContext};

use crate::error::{TestError, TestResult};
use crate::world::{default_context, Backend, World};

/// Kind of failure expected from preparing a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    UnknownEntity,
    UnknownProperty,
    InvalidPath,
    TypeCoercion,
    InvalidOperator,
    UnsortableProperty,
    FunctionResolution,
    Translation,
    TranslationDepthExceeded,
}

impl ErrorKind {
    pub fn of(error: &EqlError) -> Self {
        match error {
            EqlError::Parse(_) => ErrorKind::Parse,
            EqlError::Prepare(e) => match e {
                PrepareError::UnknownEntity(_) => ErrorKind::UnknownEntity,
                PrepareError::UnknownProperty { .. } => ErrorKind::UnknownProperty,
                PrepareError::InvalidPath { .. } => ErrorKind::InvalidPath,
                PrepareError::TypeCoercion { .. } => ErrorKind::TypeCoercion,
                PrepareError::InvalidOperator { .. } => ErrorKind::InvalidOperator,
                PrepareError::UnsortableProperty { .. } => ErrorKind::UnsortableProperty,
                PrepareError::FunctionResolution { .. } => ErrorKind::FunctionResolution,
                PrepareError::Translation(_) => ErrorKind::Translation,
                PrepareError::TranslationDepthExceeded { .. } => ErrorKind::TranslationDepthExceeded,
            },
        }
    }
}

/// Expected outcome of one query.
#[derive(Debug, Default)]
pub struct Expect {
    ids: Option<Vec<String>>,
    ordered: bool,
    error: Option<ErrorKind>,
}

impl Expect {
    /// The matching company ids, in any order.
    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// The matching company ids, in exactly this order.
    pub fn ordered<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut expect = self.ids(ids);
        expect.ordered = true;
        expect
    }

    /// No company matches.
    pub fn none(self) -> Self {
        self.ids(Vec::<String>::new())
    }

    /// Preparation fails with this kind of error.
    pub fn error(mut self, kind: ErrorKind) -> Self {
        self.error = Some(kind);
        self
    }
}

struct Step {
    query: String,
    context: QueryContext,
    expect: Expect,
}

/// A named list of queries checked against every backend.
pub struct Scenario {
    name: String,
    context: QueryContext,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: default_context(),
            steps: Vec::new(),
        }
    }

    /// Context for the queries added after this call.
    pub fn context(mut self, context: QueryContext) -> Self {
        self.context = context;
        self
    }

    pub fn query(mut self, query: impl Into<String>, expect: impl FnOnce(Expect) -> Expect) -> Self {
        self.steps.push(Step {
            query: query.into(),
            context: self.context.clone(),
            expect: expect(Expect::default()),
        });
        self
    }

    pub fn run(&self) -> TestResult<()> {
        let world = World::new()?;
        for step in &self.steps {
            self.run_step(&world, step)?;
        }
        Ok(())
    }

    fn run_step(&self, world: &World, step: &Step) -> TestResult<()> {
        log::debug!("[{}] {}", self.name, step.query);
        let prepared = match (world.prepare(&step.query, &step.context), step.expect.error) {
            (Err(e), Some(kind)) if ErrorKind::of(&e) == kind => return Ok(()),
            (Err(e), _) => return Err(self.fail(step, format!("preparation failed: {}", e))),
            (Ok(prepared), Some(kind)) => {
                return Err(self.fail(step, format!("expected {:?}, prepared as '{}'", kind, prepared)))
            }
            (Ok(prepared), None) => prepared,
        };

        let again = world
            .preparer()
            .prepare("Company", &prepared, &step.context)
            .map_err(|e| self.fail(step, format!("re-preparation failed: {}", e)))?;
        if again != prepared {
            return Err(self.fail(step, format!("re-preparation changed '{}' into '{}'", prepared, again)));
        }

        let Some(expected) = &step.expect.ids else {
            return Ok(());
        };
        for backend in Backend::ALL {
            let mut actual = world.ids(backend, &prepared)?;
            let mut expected = expected.clone();
            if !step.expect.ordered {
                actual.sort();
                expected.sort();
            }
            if actual != expected {
                return Err(TestError::Mismatch {
                    scenario: self.name.clone(),
                    query: step.query.clone(),
                    backend,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    fn fail(&self, step: &Step, message: String) -> TestError {
        TestError::step(&self.name, &step.query, message)
    }
}
