//! Test-only helpers for building trees and observing execution.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::step::Step;

/// A feature with one scenario fanning out into `givens × whens × thens`.
///
/// Descriptions are unique: `grid`, `grid scenario`, `g{i}`, `g{i} w{j}`,
/// `g{i} w{j} t{k}`.
pub fn grid_feature(givens: usize, whens: usize, thens: usize) -> Step {
    let mut feature = Step::feature("grid");
    let scenario = feature.scenario("grid scenario");
    for g in 0..givens {
        let given = scenario.given(format!("g{g}"));
        for w in 0..whens {
            let when = given.when(format!("g{g} w{w}"));
            for t in 0..thens {
                when.then(format!("g{g} w{w} t{t}"));
            }
        }
    }
    feature
}

/// Counts action invocations per step description.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    counts: Arc<Mutex<BTreeMap<String, usize>>>,
}

impl Recorder {
    /// Wrap every action in `root` (and give action-less steps one) so each
    /// invocation is counted before the wrapped action runs.
    pub fn instrument(&self, root: &mut Step) {
        root.visit_mut(&mut |step: &mut Step| {
            let inner = step.action_fn().cloned();
            let counts = Arc::clone(&self.counts);
            let key = step.description().to_string();
            step.action(move |env| {
                *counts
                    .lock()
                    .expect("recorder lock")
                    .entry(key.clone())
                    .or_default() += 1;
                match &inner {
                    Some(action) => action(env),
                    None => Ok(()),
                }
            });
        });
    }

    pub fn count(&self, description: &str) -> usize {
        self.counts()
            .get(description)
            .copied()
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.counts().values().sum()
    }

    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.counts.lock().expect("recorder lock").clone()
    }
}
