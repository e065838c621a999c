//! Scheduler subsystem modules.

mod core;
pub(crate) mod registry;
pub(crate) mod slab;

pub use self::core::{LoopError, RunReport, Scheduler};
