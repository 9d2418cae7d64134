use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per course id. Holding the guard serializes the gate's
/// check-then-insert against other writers of the same course.
///
/// The locks live in this process only. Several engines writing to one Postgres
/// database are not serialized against each other; run the write path from a single
/// process. Entries nobody holds or waits on are dropped on the next `lock` call.
#[derive(Default)]
pub struct CourseLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl CourseLocks {
    pub async fn lock(&self, course_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = match self.locks.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            locks.retain(|id, lock| id == course_id || Arc::strong_count(lock) > 1);
            locks.entry(course_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}
