//! Level-synchronized execution.
//!
//! Each node's action runs exactly once. Its resulting environment is cloned
//! once per child and the children run concurrently; the node then joins on
//! all of them before reporting. Actions that touch state outside the
//! environment can therefore be observed by sibling branches in any
//! interleaving. Use the chain strategy when that matters.

use anyhow::Result;
use tracing::{debug, instrument};

use crate::core::report::Report;
use crate::environment::Environment;
use crate::exec::capture::invoke;
use crate::exec::pool::{WorkerPool, fan_out};
use crate::step::Step;

/// Run every feature as one top-level unit, handing each feature's report to
/// `sink` as it completes.
#[instrument(skip_all, fields(features = features.len(), workers = pool.workers()))]
pub fn execute<F>(pool: &WorkerPool, features: &[Step], env: &Environment, sink: F) -> Result<()>
where
    F: FnMut(Report) -> Result<()>,
{
    pool.stream(
        |scope, submitter| {
            for feature in features {
                let env = env.clone();
                let submitter = submitter.clone();
                scope.spawn_fifo(move |_| submitter.send(run_node(feature, env)));
            }
        },
        sink,
    )
}

/// Run `step` against `env`, then fan out to its children.
///
/// The returned report starts with the node's own line, followed by either
/// its failure trace or its children's reports in completion order.
pub fn run_node(step: &Step, mut env: Environment) -> Report {
    let mut report = Report::new();
    report.step(step);

    if let Err(failure) = invoke(step, &mut env) {
        report.failure(step, &failure.trace);
        return report;
    }

    let branches: Vec<(&Step, Environment)> =
        step.children().map(|child| (child, env.clone())).collect();
    if branches.is_empty() {
        return report;
    }
    debug!(
        kind = %step.kind(),
        description = step.description(),
        children = branches.len(),
        "dispatching children"
    );
    for child in fan_out(branches, |(child, env)| run_node(child, env)) {
        report.append(child);
    }
    report
}
