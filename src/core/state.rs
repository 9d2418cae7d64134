use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::core::config::Settings;
use crate::repositories::GradingStore;
use crate::services::course_locks::CourseLocks;
use crate::services::notifications::NotificationSender;

/// Tunables of the engine that do not come from the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Upper bound for a single notification call inside the sweep.
    pub notify_timeout: Duration,
    /// How often the sweep retries a penalty write that lost a race with a regrade.
    pub penalty_write_attempts: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { notify_timeout: Duration::from_secs(10), penalty_write_attempts: 3 }
    }
}

impl EngineOptions {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        Self {
            notify_timeout: Duration::from_secs(settings.notifications().timeout_seconds),
            ..Self::default()
        }
    }
}

/// Shared handle to the grading core. Cloning is cheap.
#[derive(Clone)]
pub struct GradingEngine {
    inner: Arc<InnerEngine>,
}

struct InnerEngine {
    store: Arc<dyn GradingStore>,
    notifier: Arc<dyn NotificationSender>,
    options: EngineOptions,
    course_locks: CourseLocks,
    sweep_lock: Mutex<()>,
}

impl GradingEngine {
    pub fn new(
        store: Arc<dyn GradingStore>,
        notifier: Arc<dyn NotificationSender>,
        options: EngineOptions,
    ) -> Self {
        Self {
            inner: Arc::new(InnerEngine {
                store,
                notifier,
                options,
                course_locks: CourseLocks::default(),
                sweep_lock: Mutex::new(()),
            }),
        }
    }

    pub(crate) fn store(&self) -> &dyn GradingStore {
        self.inner.store.as_ref()
    }

    pub(crate) fn notifier(&self) -> &dyn NotificationSender {
        self.inner.notifier.as_ref()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.inner.options
    }

    pub(crate) fn course_locks(&self) -> &CourseLocks {
        &self.inner.course_locks
    }

    pub(crate) fn sweep_lock(&self) -> &Mutex<()> {
        &self.inner.sweep_lock
    }
}
