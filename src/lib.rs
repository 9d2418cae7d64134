//! Grading-rule engine for university courses: point-distribution formulas, the
//! assignment gate, late penalties applied by a recurring deadline sweep, and the
//! per-course gradebook.

pub(crate) mod api;
pub mod core;
pub mod db;
pub mod errors;
pub mod repositories;
pub mod schemas;
pub mod services;
pub mod tasks;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Context;

use crate::core::config::Settings;
use crate::core::telemetry;
use crate::services::notifications::{LogNotifier, NotificationSender, WebhookNotifier};
use crate::tasks::scheduler::{self, SweepIntervals};

pub use crate::core::state::{EngineOptions, GradingEngine};
pub use crate::errors::{FormulaInvalid, GradingError, Rejection, StoreError};
pub use crate::repositories::{GradingStore, MemoryStore, PgStore};
pub use crate::services::penalty::PenaltyResult;

/// Entry point of the `unigrade-worker` binary.
pub async fn run_worker() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db_pool = db::init_pool(&settings).await.context("Failed to connect to Postgres")?;
    db::run_migrations(&db_pool).await.context("Failed to run migrations")?;

    let notifier: Arc<dyn NotificationSender> = match WebhookNotifier::from_settings(&settings)? {
        Some(webhook) => Arc::new(webhook),
        None => {
            tracing::warn!("NOTIFY_WEBHOOK_URL is not set; notifications go to the log only");
            Arc::new(LogNotifier)
        }
    };

    let engine = GradingEngine::new(
        Arc::new(PgStore::new(db_pool)),
        notifier,
        EngineOptions::from_settings(&settings),
    );
    let intervals = SweepIntervals {
        reminders: std::time::Duration::from_secs(settings.sweep().reminder_interval_seconds),
        penalties: std::time::Duration::from_secs(settings.sweep().penalty_interval_seconds),
    };

    tracing::info!(
        environment = %settings.runtime().environment.as_str(),
        reminder_interval_seconds = settings.sweep().reminder_interval_seconds,
        penalty_interval_seconds = settings.sweep().penalty_interval_seconds,
        "Unigrade worker started"
    );

    scheduler::run(engine, intervals).await
}
