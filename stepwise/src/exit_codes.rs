//! Stable exit codes for stepwise CLI commands.

/// Command succeeded. Also used for runs with step failures unless
/// `--fail-on-error` is given.
pub const OK: i32 = 0;
/// Command failed due to invalid config, environment, options or other errors.
pub const INVALID: i32 = 1;
/// `stepwise run --fail-on-error` recorded at least one step failure.
pub const STEP_FAILURES: i32 = 2;
