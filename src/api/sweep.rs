use time::OffsetDateTime;

use crate::core::state::GradingEngine;
use crate::errors::GradingError;
use crate::schemas::sweep::{SweepReport, SweepScope};
use crate::tasks::deadline_sweep;

impl GradingEngine {
    /// Reminders and penalties in one pass, as of `now`.
    pub async fn run_deadline_sweep(
        &self,
        now: OffsetDateTime,
    ) -> Result<SweepReport, GradingError> {
        self.run_sweep(now, SweepScope::All).await
    }

    /// Overlapping calls wait for each other.
    pub async fn run_sweep(
        &self,
        now: OffsetDateTime,
        scope: SweepScope,
    ) -> Result<SweepReport, GradingError> {
        deadline_sweep::run(self, now, scope).await
    }
}
