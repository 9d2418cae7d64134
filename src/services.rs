pub mod assignment_gate;
pub mod course_locks;
pub mod formula;
pub mod gradebook;
pub mod notifications;
pub mod penalty;
