//! Concurrent execution of a behavior tree.
//!
//! [`fast`] and [`chain`] are the two strategies; both are fan-out/join
//! schedulers over the single [`pool::WorkerPool`] of a run and both guard
//! every action through [`capture::invoke`].

pub mod capture;
pub mod chain;
pub mod fast;
pub mod pool;
