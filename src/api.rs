//! Operations the grading core exposes to the surrounding application, as methods on
//! [`GradingEngine`](crate::core::state::GradingEngine).

mod assignments;
mod courses;
mod formulas;
mod gradebook;
mod records;
mod sweep;
