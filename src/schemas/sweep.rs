use serde::Serialize;

/// Which branches of the deadline sweep to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepScope {
    All,
    RemindersOnly,
    PenaltiesOnly,
}

impl SweepScope {
    pub(crate) fn reminders(self) -> bool {
        matches!(self, SweepScope::All | SweepScope::RemindersOnly)
    }

    pub(crate) fn penalties(self) -> bool {
        matches!(self, SweepScope::All | SweepScope::PenaltiesOnly)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SweepScope::All => "all",
            SweepScope::RemindersOnly => "reminders",
            SweepScope::PenaltiesOnly => "penalties",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub assignments_scanned: usize,
    pub reminders_sent: usize,
    pub penalties_applied: usize,
    pub notification_failures: usize,
}
