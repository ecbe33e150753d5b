//! Behavior-specification execution engine.
//!
//! Suite authors describe behavior as a tree of `Feature → Scenario → Given →
//! When → Then` steps; the engine runs every reachable combination of steps
//! with bounded concurrency and reports pass/fail per branch as indented text.
//! The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (kinds, chain enumeration, report
//!   layout). No I/O, no threads.
//! - **[`exec`]**: The worker pool, guarded action invocation, and the two
//!   strategies ([`exec::fast`], [`exec::chain`]).
//!
//! [`suite`] ties the two together behind [`Suite::run`].
//!
//! ```no_run
//! use stepwise::{Environment, Suite};
//!
//! let mut suite = Suite::new();
//! suite
//!     .feature("mathematics")
//!     .scenario("basic operations")
//!     .given("a number, x, that is odd")
//!     .action(|env| env.insert("x", 27))
//!     .when("doubled")
//!     .action(|env| {
//!         let x: i64 = env.get_as("x")?;
//!         env.insert("result", x * 2)
//!     })
//!     .then("the result is even")
//!     .action(|env| {
//!         anyhow::ensure!(env.get_as::<i64>("result")? % 2 == 0, "not even");
//!         Ok(())
//!     });
//! suite.run(Environment::new())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod demo;
pub mod environment;
pub mod exec;
pub mod exit_codes;
pub mod logging;
pub mod step;
pub mod strategy;
pub mod suite;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use environment::Environment;
pub use step::{Action, Step};
pub use strategy::Strategy;
pub use suite::{Fixture, RunOptions, RunSummary, Suite};
