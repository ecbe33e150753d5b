//! Text rendering for step outcomes.
//!
//! Layout is a pure function of a node's kind, conjunction flag and
//! description, so both executors produce identical lines for the same node.

use crate::step::Step;

const INDENT: &str = "    ";

/// Accumulated report lines for one unit of work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub lines: Vec<String>,
    /// Step failures recorded in `lines`.
    pub failures: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the report line for a step.
    pub fn step(&mut self, step: &Step) {
        self.lines.push(step_line(step));
    }

    /// Record a failure trace beneath a step's line.
    pub fn failure(&mut self, step: &Step, trace: &str) {
        self.lines.extend(trace_lines(step, trace));
        self.failures += 1;
    }

    /// Append a child unit's report.
    pub fn append(&mut self, other: Report) {
        self.lines.extend(other.lines);
        self.failures += other.failures;
    }

    pub fn failed(&self) -> bool {
        self.failures > 0
    }

    /// Lines joined for output, followed by the blank separator line.
    pub fn render_block(&self) -> String {
        let mut buf = self.lines.join("\n");
        buf.push_str("\n\n");
        buf
    }
}

/// `4×depth` spaces, the kind label, `": "`, the capitalized description, `"."`.
pub fn step_line(step: &Step) -> String {
    format!(
        "{}{}: {}.",
        INDENT.repeat(step.depth()),
        step.label(),
        capitalize(step.description())
    )
}

/// Trace text indented to sit under the description of `step`'s line.
///
/// Blank trace lines are dropped.
pub fn trace_lines(step: &Step, trace: &str) -> Vec<String> {
    let prefix = format!(
        "{}{}",
        INDENT.repeat(step.depth()),
        " ".repeat(step.label().len() + 2)
    );
    trace
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("{prefix}{line}"))
        .collect()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kind::StepKind;

    #[test]
    fn step_line_indents_by_kind_depth() {
        let mut feature = Step::feature("mathematics");
        assert_eq!(step_line(&feature), "Feature: Mathematics.");

        let then = feature.then("the result is even");
        assert_eq!(step_line(then), "                Then: The result is even.");
    }

    #[test]
    fn conjunction_line_uses_and_label() {
        let mut given = Step::new(StepKind::Given, "a number, x, that is odd");
        let and = given.given("a number, y, that is even");
        assert_eq!(step_line(and), "          And: A number, y, that is even.");
    }

    #[test]
    fn trace_lines_align_under_description() {
        let step = Step::new(StepKind::Then, "the result is even");
        let lines = trace_lines(&step, "panicked: attempt to divide by zero\n\n  at here\n");
        assert_eq!(
            lines,
            vec![
                "                      panicked: attempt to divide by zero",
                "                        at here",
            ]
        );
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn report_tracks_failures_across_appends() {
        let step = Step::feature("f");
        let mut parent = Report::new();
        parent.step(&step);
        let mut child = Report::new();
        child.failure(&step, "boom");
        parent.append(child);
        assert!(parent.failed());
        assert_eq!(parent.render_block(), "Feature: F.\n         boom\n\n");
    }
}
