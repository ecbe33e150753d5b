//! Bundled demonstration suites, runnable via `stepwise run <name>`.

use anyhow::{Result, anyhow, ensure};

use crate::suite::{Fixture, Suite};

/// Names accepted by [`suite`], in listing order.
pub const NAMES: [&str; 3] = ["mathematics", "mathematics-broken", "lists"];

/// Look up a bundled suite by name.
pub fn suite(name: &str) -> Result<Suite> {
    match name {
        "mathematics" => Ok(mathematics(false)),
        "mathematics-broken" => Ok(mathematics(true)),
        "lists" => Ok(lists()),
        other => Err(anyhow!(
            "unknown suite '{other}' (available: {})",
            NAMES.join(", ")
        )),
    }
}

/// Odd/even arithmetic over `x = 27` and `y = 42`.
///
/// With `broken` set, the multiplication check divides by zero instead of
/// asserting, which fails that branch while addition still passes.
pub fn mathematics(broken: bool) -> Suite {
    let mut suite = Suite::new().with_fixture(Fixture::new(
        |_| {
            println!("Tests starting.\n");
            Ok(())
        },
        |_| {
            println!("Finished.");
            Ok(())
        },
    ));

    let y_even = suite
        .feature("mathematics")
        .scenario("basic operations")
        .given("a number, x, that is odd")
        .action(|env| env.insert("x", 27))
        .given("a number, y, that is even")
        .action(|env| env.insert("y", 42));

    y_even
        .when("multiplied together")
        .action(|env| {
            let x: i64 = env.get_as("x")?;
            let y: i64 = env.get_as("y")?;
            env.insert("result", x * y)
        })
        .then("the result is even")
        .action(move |env| {
            ensure!(env.contains("result"), "Result missing.");
            let result: i64 = env.get_as("result")?;
            if broken {
                let zero: i64 = env.get_as::<i64>("x")? - 27;
                let _ = result / zero;
            }
            ensure!(result % 2 == 0, "Result ({result}) is not even!");
            Ok(())
        });

    y_even
        .when("added together")
        .action(|env| {
            let x: i64 = env.get_as("x")?;
            let y: i64 = env.get_as("y")?;
            env.insert("result", x + y)
        })
        .then("the result is odd")
        .action(|env| {
            ensure!(env.contains("result"), "Result missing.");
            let result: i64 = env.get_as("result")?;
            ensure!(result % 2 == 1, "Result ({result}) is not odd!");
            Ok(())
        });

    suite
}

/// Programmer-domain example: adding to a list that never grows.
///
/// "We add an object" forgets to push, so its then-step fails.
pub fn lists() -> Suite {
    let mut suite = Suite::new();
    let new_list = suite
        .feature("lists behave in predictable ways")
        .scenario("lists should know when they are empty")
        .given("a new list")
        .action(|env| env.insert("l", Vec::<i64>::new()));

    new_list
        .when("nothing is added")
        .then("the list should be empty")
        .action(|env| {
            let list: Vec<i64> = env.get_as("l")?;
            ensure!(list.is_empty(), "List is not empty!");
            Ok(())
        });

    new_list
        .when("we add an object")
        .then("the list should not be empty")
        .action(|env| {
            let list: Vec<i64> = env.get_as("l")?;
            ensure!(!list.is_empty(), "List is empty!");
            Ok(())
        });

    suite
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chain::chains;
    use crate::environment::Environment;
    use crate::strategy::Strategy;
    use crate::suite::RunOptions;

    const MATHEMATICS_REPORT: &str = "\
Feature: Mathematics.
    Scenario: Basic operations.
        Given: A number, x, that is odd.
          And: A number, y, that is even.
            When: Multiplied together.
                Then: The result is even.
            When: Added together.
                Then: The result is odd.

";

    fn render(suite: &Suite, options: RunOptions) -> (String, crate::RunSummary) {
        let mut out = Vec::new();
        let summary = suite
            .run_to(&mut out, Environment::new(), options)
            .expect("run");
        (String::from_utf8(out).expect("utf8"), summary)
    }

    fn sorted_lines(text: &str) -> Vec<&str> {
        let mut lines: Vec<&str> = text.lines().collect();
        lines.sort_unstable();
        lines
    }

    #[test]
    fn mathematics_single_worker_matches_expected_report() {
        let (text, summary) = render(&mathematics(false), RunOptions::default());
        assert_eq!(text, MATHEMATICS_REPORT);
        assert!(summary.passed());
        assert_eq!(summary.units, 1);
    }

    #[test]
    fn mathematics_many_workers_reports_the_same_lines() {
        let options = RunOptions {
            workers: 8,
            strategy: Strategy::Fast,
        };
        let (text, summary) = render(&mathematics(false), options);
        assert!(summary.passed());
        assert_eq!(sorted_lines(&text), sorted_lines(MATHEMATICS_REPORT));
        assert!(text.starts_with("Feature: Mathematics.\n    Scenario: Basic operations.\n"));
    }

    #[test]
    fn broken_multiplication_fails_only_its_branch() {
        for strategy in [Strategy::Fast, Strategy::Chain] {
            let options = RunOptions {
                workers: 4,
                strategy,
            };
            let (text, summary) = render(&mathematics(true), options);
            assert_eq!(summary.failed_steps, 1, "{text}");
            assert!(text.contains(
                "                Then: The result is even.\n                      panicked: attempt to divide by zero\n"
            ));
            assert!(text.contains("                Then: The result is odd.\n"));
            assert!(!text.contains("is not odd"));
        }
    }

    #[test]
    fn mathematics_chain_strategy_runs_two_chains() {
        let suite = mathematics(false);
        assert_eq!(chains(&suite.features()[0]).len(), 2);

        let options = RunOptions {
            workers: 1,
            strategy: Strategy::Chain,
        };
        let (text, summary) = render(&suite, options);
        assert_eq!(summary.units, 2);
        assert!(summary.passed());
        assert_eq!(
            text,
            "\
Feature: Mathematics.
    Scenario: Basic operations.
        Given: A number, x, that is odd.
          And: A number, y, that is even.
            When: Multiplied together.
                Then: The result is even.

Feature: Mathematics.
    Scenario: Basic operations.
        Given: A number, x, that is odd.
          And: A number, y, that is even.
            When: Added together.
                Then: The result is odd.

"
        );
    }

    #[test]
    fn lists_reports_the_empty_list_bug() {
        let (text, summary) = render(&lists(), RunOptions::default());
        assert_eq!(summary.failed_steps, 1);
        assert!(text.contains(
            "                Then: The list should not be empty.\n                      List is empty!\n"
        ));
        assert!(text.contains("                Then: The list should be empty.\n"));
    }

    #[test]
    fn unknown_suite_lists_available_names() {
        let err = suite("physics").err().expect("unknown");
        assert!(err.to_string().contains("mathematics-broken"));
    }
}
