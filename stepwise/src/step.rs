//! Behavior-tree nodes and the registration API used to build them.
//!
//! Every node has the same shape: a kind, a description, an optional action,
//! and four ordered child slots. Registration is capability based, so any node
//! may populate any slot. A typical tree still nests
//! Feature → Scenario → Given → When → Then.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::core::kind::{Stage, StepKind};
use crate::environment::Environment;

/// User-supplied step body.
///
/// Leaving the environment untouched is the "return nothing" case; assigning
/// to `*env` replaces it wholesale. An `Err` (or a panic) is a step failure.
pub type Action = Arc<dyn Fn(&mut Environment) -> Result<()> + Send + Sync>;

/// One node of the behavior tree.
pub struct Step {
    kind: StepKind,
    description: String,
    action: Option<Action>,
    is_conjunction: bool,
    children: [Vec<Step>; 4],
}

impl Step {
    /// Create a detached node with no action and no children.
    pub fn new(kind: StepKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            action: None,
            is_conjunction: false,
            children: Default::default(),
        }
    }

    /// Create a top-level feature node.
    pub fn feature(description: impl Into<String>) -> Self {
        Self::new(StepKind::Feature, description)
    }

    /// Attach the action run when this node executes.
    pub fn action<F>(&mut self, action: F) -> &mut Self
    where
        F: Fn(&mut Environment) -> Result<()> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Append a new child of kind `stage` to the `stage` slot and return it.
    ///
    /// The child is a conjunction ("And") when this node has the same kind.
    pub fn register(&mut self, stage: Stage, description: impl Into<String>) -> &mut Step {
        let mut child = Step::new(stage.kind(), description);
        child.is_conjunction = self.kind == stage.kind();
        let slot = &mut self.children[stage.index()];
        slot.push(child);
        let last = slot.len() - 1;
        &mut slot[last]
    }

    pub fn scenario(&mut self, description: impl Into<String>) -> &mut Step {
        self.register(Stage::Scenario, description)
    }

    pub fn given(&mut self, description: impl Into<String>) -> &mut Step {
        self.register(Stage::Given, description)
    }

    pub fn when(&mut self, description: impl Into<String>) -> &mut Step {
        self.register(Stage::When, description)
    }

    pub fn then(&mut self, description: impl Into<String>) -> &mut Step {
        self.register(Stage::Then, description)
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_conjunction(&self) -> bool {
        self.is_conjunction
    }

    pub fn depth(&self) -> usize {
        self.kind.depth()
    }

    /// Kind label, `And` for conjunctions.
    pub fn label(&self) -> String {
        self.kind.label(self.is_conjunction)
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Children registered on one slot, in registration order.
    pub fn slot(&self, stage: Stage) -> &[Step] {
        &self.children[stage.index()]
    }

    /// All children, slot by slot in visitation order.
    pub fn children(&self) -> impl Iterator<Item = &Step> {
        Stage::ORDER
            .into_iter()
            .flat_map(move |stage| self.slot(stage).iter())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Vec::is_empty)
    }

    /// Visit this node and every descendant, parents before children.
    pub fn visit_mut(&mut self, visit: &mut dyn FnMut(&mut Step)) {
        visit(self);
        for slot in &mut self.children {
            for child in slot {
                child.visit_mut(visit);
            }
        }
    }

    pub(crate) fn action_fn(&self) -> Option<&Action> {
        self.action.as_ref()
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("has_action", &self.action.is_some())
            .field("is_conjunction", &self.is_conjunction)
            .field("children", &self.children)
            .finish()
    }
}
