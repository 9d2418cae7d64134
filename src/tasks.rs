pub mod deadline_sweep;
pub(crate) mod scheduler;
