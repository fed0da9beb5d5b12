//! Pure field derivations used by the pipeline columns.

pub mod dates;
pub mod phase;
pub mod subtasks;
pub mod values;
pub mod waiver;
