//! Shared helpers for the stretch engines.

pub(crate) mod parallel;
