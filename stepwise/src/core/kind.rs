//! Step kinds and the fixed lookup table that drives layout.
//!
//! Depth is a property of the kind, never of where a node sits in the tree: a
//! `Given` registered directly under a `Feature` still renders at depth 2.

use std::fmt;

/// The five kinds of step a behavior tree is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Feature,
    Scenario,
    Given,
    When,
    Then,
}

impl StepKind {
    /// Fixed indentation depth (Feature=0 .. Then=4).
    pub fn depth(self) -> usize {
        match self {
            StepKind::Feature => 0,
            StepKind::Scenario => 1,
            StepKind::Given => 2,
            StepKind::When => 3,
            StepKind::Then => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StepKind::Feature => "Feature",
            StepKind::Scenario => "Scenario",
            StepKind::Given => "Given",
            StepKind::When => "When",
            StepKind::Then => "Then",
        }
    }

    /// Label printed before the description.
    ///
    /// Conjunctions print `And` right-aligned to the width of the kind name so
    /// the colon lines up with a plain sibling at the same depth.
    pub fn label(self, is_conjunction: bool) -> String {
        if is_conjunction {
            format!("{:>width$}", "And", width = self.name().len())
        } else {
            self.name().to_string()
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A child slot on a step. Every step carries all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Scenario,
    Given,
    When,
    Then,
}

impl Stage {
    /// Slot visitation order for enumeration and fan-out.
    pub const ORDER: [Stage; 4] = [Stage::Scenario, Stage::Given, Stage::When, Stage::Then];

    /// Kind of the node a registration on this slot creates.
    pub fn kind(self) -> StepKind {
        match self {
            Stage::Scenario => StepKind::Scenario,
            Stage::Given => StepKind::Given,
            Stage::When => StepKind::When,
            Stage::Then => StepKind::Then,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Stage::Scenario => 0,
            Stage::Given => 1,
            Stage::When => 2,
            Stage::Then => 3,
        }
    }
}
