//! Domain layer: pure types and state machines, no I/O.

pub mod billing;
pub mod foundation;
pub mod review;
pub mod sync;
