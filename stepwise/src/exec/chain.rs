//! Path-enumerated execution.
//!
//! Every root-to-leaf chain runs as its own unit against a private copy of the
//! initial environment, so no two chains share ancestor state. Ancestors run
//! once per chain through them; a failing ancestor is reported once per chain.

use anyhow::Result;
use tracing::{debug, instrument};

use crate::core::chain::{Chain, chains};
use crate::core::report::Report;
use crate::environment::Environment;
use crate::exec::capture::invoke;
use crate::exec::pool::WorkerPool;
use crate::step::Step;

/// Run every chain of every feature as one top-level unit, handing each
/// chain's report to `sink` as it completes.
#[instrument(skip_all, fields(features = features.len(), workers = pool.workers()))]
pub fn execute<F>(pool: &WorkerPool, features: &[Step], env: &Environment, sink: F) -> Result<()>
where
    F: FnMut(Report) -> Result<()>,
{
    let all: Vec<Chain<'_>> = features.iter().flat_map(chains).collect();
    debug!(chains = all.len(), "chains enumerated");

    pool.stream(
        |scope, submitter| {
            for chain in all {
                let env = env.clone();
                let submitter = submitter.clone();
                scope.spawn_fifo(move |_| submitter.send(run_chain(&chain, env)));
            }
        },
        sink,
    )
}

/// Run the steps of one chain in order, threading the environment through.
///
/// Stops at the first failure.
pub fn run_chain(chain: &[&Step], mut env: Environment) -> Report {
    let mut report = Report::new();
    for step in chain {
        report.step(step);
        if let Err(failure) = invoke(step, &mut env) {
            report.failure(step, &failure.trace);
            break;
        }
    }
    report
}
