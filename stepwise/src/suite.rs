//! Suites: the top-level features plus how to run them.
//!
//! A run builds one worker pool, applies the optional fixture's setup to the
//! initial environment, hands the features to the selected executor, and writes
//! each top-level unit's block to the output as soon as it completes. Step
//! failures only ever show up as report text and in the returned
//! [`RunSummary`]; they never make the run itself fail.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use tracing::{info, instrument};

use crate::core::report::Report;
use crate::environment::Environment;
use crate::exec::pool::WorkerPool;
use crate::exec::{chain, fast};
use crate::step::Step;
use crate::strategy::Strategy;

/// Setup or teardown callback.
pub type Hook = Box<dyn Fn(&mut Environment) -> Result<()> + Send + Sync>;

/// Setup/teardown pair run once around a whole invocation.
pub struct Fixture {
    setup: Hook,
    teardown: Hook,
}

impl Fixture {
    pub fn new<S, T>(setup: S, teardown: T) -> Self
    where
        S: Fn(&mut Environment) -> Result<()> + Send + Sync + 'static,
        T: Fn(&mut Environment) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            setup: Box::new(setup),
            teardown: Box::new(teardown),
        }
    }
}

/// Knobs for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Size of the worker pool.
    pub workers: usize,
    pub strategy: Strategy,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            strategy: Strategy::Fast,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("workers must be > 0");
        }
        Ok(())
    }
}

/// Aggregate outcome of a run.
///
/// The printed report never depends on this; callers that need a pass/fail
/// signal (CI, exit codes) derive it from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub strategy: Strategy,
    /// Top-level units written: features for `fast`, chains for `chain`.
    pub units: usize,
    /// Units whose report contains at least one failure.
    pub failed_units: usize,
    /// Failure traces written across all units.
    pub failed_steps: usize,
}

impl RunSummary {
    fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            units: 0,
            failed_units: 0,
            failed_steps: 0,
        }
    }

    fn record(&mut self, report: &Report) {
        self.units += 1;
        self.failed_steps += report.failures;
        if report.failed() {
            self.failed_units += 1;
        }
    }

    pub fn passed(&self) -> bool {
        self.failed_units == 0
    }
}

/// An ordered collection of features with run defaults.
#[derive(Default)]
pub struct Suite {
    features: Vec<Step>,
    fixture: Option<Fixture>,
    defaults: RunOptions,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.fixture = Some(fixture);
        self
    }

    pub fn with_defaults(mut self, defaults: RunOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Register a top-level feature and return it for further registration.
    pub fn feature(&mut self, description: impl Into<String>) -> &mut Step {
        self.add_feature(Step::feature(description))
    }

    /// Append an already built feature tree.
    pub fn add_feature(&mut self, feature: Step) -> &mut Step {
        self.features.push(feature);
        let last = self.features.len() - 1;
        &mut self.features[last]
    }

    pub fn features(&self) -> &[Step] {
        &self.features
    }

    pub fn defaults(&self) -> RunOptions {
        self.defaults
    }

    /// Run with the suite's defaults, printing to stdout.
    pub fn run(&self, env: Environment) -> Result<RunSummary> {
        self.run_with(env, self.defaults)
    }

    /// Run with explicit options, printing to stdout.
    pub fn run_with(&self, env: Environment, options: RunOptions) -> Result<RunSummary> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out, env, options)
    }

    /// Run with explicit options, writing report blocks to `out`.
    #[instrument(skip_all, fields(strategy = %options.strategy, workers = options.workers))]
    pub fn run_to<W: Write>(
        &self,
        out: &mut W,
        mut env: Environment,
        options: RunOptions,
    ) -> Result<RunSummary> {
        options.validate()?;
        let pool = WorkerPool::new(options.workers)?;

        if let Some(fixture) = &self.fixture {
            (fixture.setup)(&mut env).context("suite setup")?;
        }
        info!(features = self.features.len(), "run started");

        let mut summary = RunSummary::new(options.strategy);
        let sink = |report: Report| -> Result<()> {
            summary.record(&report);
            out.write_all(report.render_block().as_bytes())
                .context("write report")?;
            out.flush().context("flush report")
        };
        let outcome = match options.strategy {
            Strategy::Fast => fast::execute(&pool, &self.features, &env, sink),
            Strategy::Chain => chain::execute(&pool, &self.features, &env, sink),
        };

        let teardown = match &self.fixture {
            Some(fixture) => (fixture.teardown)(&mut env).context("suite teardown"),
            None => Ok(()),
        };
        outcome?;
        teardown?;

        info!(
            units = summary.units,
            failed_units = summary.failed_units,
            failed_steps = summary.failed_steps,
            "run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn render(suite: &Suite, env: Environment, options: RunOptions) -> (String, RunSummary) {
        let mut out = Vec::new();
        let summary = suite.run_to(&mut out, env, options).expect("run");
        (String::from_utf8(out).expect("utf8"), summary)
    }

    #[test]
    fn feature_registration_preserves_order() {
        let mut suite = Suite::new();
        suite.feature("first");
        suite.feature("second");
        let names: Vec<&str> = suite.features().iter().map(Step::description).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn defaults_start_at_one_fast_worker() {
        assert_eq!(Suite::new().defaults(), RunOptions::default());
        let options = RunOptions {
            workers: 10,
            strategy: Strategy::Chain,
        };
        assert_eq!(Suite::new().with_defaults(options).defaults(), options);
    }

    #[test]
    fn blocks_are_separated_by_blank_lines() {
        let mut suite = Suite::new();
        suite.feature("one").scenario("a");
        suite.feature("two");

        let (text, summary) = render(&suite, Environment::new(), RunOptions::default());
        assert_eq!(
            text,
            "Feature: One.\n    Scenario: A.\n\nFeature: Two.\n\n"
        );
        assert_eq!(summary.units, 2);
        assert!(summary.passed());
    }

    #[test]
    fn fixture_wraps_the_run_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let setup_calls = Arc::clone(&calls);
        let teardown_calls = Arc::clone(&calls);
        let mut suite = Suite::new().with_fixture(Fixture::new(
            move |env| {
                setup_calls.lock().expect("lock").push("setup");
                env.insert("fixture", "ready")
            },
            move |env| {
                teardown_calls.lock().expect("lock").push("teardown");
                anyhow::ensure!(env.contains("fixture"), "setup state missing");
                Ok(())
            },
        ));
        for name in ["a", "b", "c"] {
            suite.feature(name).action(|env| {
                anyhow::ensure!(env.contains("fixture"), "fixture not visible");
                Ok(())
            });
        }

        let options = RunOptions {
            workers: 3,
            strategy: Strategy::Chain,
        };
        let (_, summary) = render(&suite, Environment::new(), options);
        assert!(summary.passed());
        assert_eq!(*calls.lock().expect("lock"), vec!["setup", "teardown"]);
    }

    #[test]
    fn setup_failure_aborts_before_any_unit() {
        let mut suite = Suite::new().with_fixture(Fixture::new(
            |_| anyhow::bail!("no database"),
            |_| Ok(()),
        ));
        suite.feature("unreached");

        let mut out = Vec::new();
        let err = suite
            .run_to(&mut out, Environment::new(), RunOptions::default())
            .expect_err("setup fails");
        assert!(format!("{err:#}").contains("no database"));
        assert!(out.is_empty());
    }

    #[test]
    fn step_failures_never_fail_the_run() {
        let mut suite = Suite::new();
        suite.feature("broken").action(|_| anyhow::bail!("nope"));
        suite.feature("fine");

        for strategy in [Strategy::Fast, Strategy::Chain] {
            let options = RunOptions {
                workers: 2,
                strategy,
            };
            let (text, summary) = render(&suite, Environment::new(), options);
            assert!(text.contains("nope"));
            assert_eq!(summary.units, 2);
            assert_eq!(summary.failed_units, 1);
            assert_eq!(summary.failed_steps, 1);
            assert!(!summary.passed());
        }
    }

    #[test]
    fn zero_workers_is_rejected() {
        let suite = Suite::new();
        let options = RunOptions {
            workers: 0,
            strategy: Strategy::Fast,
        };
        let mut out = Vec::new();
        let err = suite
            .run_to(&mut out, Environment::new(), options)
            .expect_err("invalid");
        assert!(err.to_string().contains("workers"));
    }
}
