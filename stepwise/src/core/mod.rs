//! Deterministic, pure logic shared by the executors.
//!
//! Core modules must be free of I/O side effects and concurrency. They operate
//! on the in-memory tree and return deterministic outputs suitable for tests.

pub mod chain;
pub mod kind;
pub mod report;
