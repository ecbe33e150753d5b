//! Guarded action invocation.
//!
//! Every action call goes through [`invoke`]: returned errors and panics are
//! both turned into a [`Failure`] carrying human-readable trace text, so a
//! failing step can never unwind into the scheduler.
//!
//! Panic locations are only visible to a panic hook. The first call to
//! [`invoke`] installs one that records the location of panics raised while a
//! step action runs on the current thread and stays silent for them; any other
//! panic is handed to the hook that was installed before.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe, catch_unwind};
use std::sync::Once;

use tracing::{debug, warn};

use crate::environment::Environment;
use crate::step::Step;

thread_local! {
    static IN_STEP: Cell<bool> = const { Cell::new(false) };
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static STEP_PANIC_HOOK: Once = Once::new();

/// A captured step failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Multi-line trace text, not yet indented.
    pub trace: String,
}

/// Run `step`'s action against `env`.
///
/// Steps without an action pass the environment through unchanged.
pub fn invoke(step: &Step, env: &mut Environment) -> Result<(), Failure> {
    let Some(action) = step.action_fn() else {
        return Ok(());
    };

    install_step_panic_hook();
    IN_STEP.with(|flag| flag.set(true));
    let outcome = catch_unwind(AssertUnwindSafe(|| action(env)));
    IN_STEP.with(|flag| flag.set(false));

    let trace = match outcome {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(err)) => format!("{err:?}"),
        Err(payload) => {
            let mut trace = format!("panicked: {}", panic_message(payload.as_ref()));
            if let Some(location) = PANIC_LOCATION.with(|slot| slot.borrow_mut().take()) {
                trace.push_str("\nat ");
                trace.push_str(&location);
            }
            trace
        }
    };
    warn!(
        kind = %step.kind(),
        description = step.description(),
        "step failed"
    );
    Err(Failure { trace })
}

fn install_step_panic_hook() {
    STEP_PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !record_step_panic(info.location().map(ToString::to_string)) {
                previous(info);
            }
        }));
    });
}

/// Store `location` for the step running on this thread.
///
/// Returns false when no step action is running here, so the panic belongs
/// to someone else.
fn record_step_panic(location: Option<String>) -> bool {
    if !IN_STEP.with(Cell::get) {
        return false;
    }
    debug!(location = location.as_deref().unwrap_or("unknown"), "step panicked");
    PANIC_LOCATION.with(|slot| *slot.borrow_mut() = location);
    true
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "non-string panic payload".to_string()
}
