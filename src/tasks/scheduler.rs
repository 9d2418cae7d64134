use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::core::state::GradingEngine;
use crate::schemas::sweep::SweepScope;

#[derive(Debug, Clone, Copy)]
pub(crate) struct SweepIntervals {
    pub(crate) reminders: Duration,
    pub(crate) penalties: Duration,
}

/// Runs the reminder and penalty passes on their own cadence until the process is
/// asked to stop. Both loops share the engine's sweep lock.
pub(crate) async fn run(engine: GradingEngine, intervals: SweepIntervals) -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handles = vec![
        tokio::spawn(sweep_loop(
            engine.clone(),
            SweepScope::RemindersOnly,
            intervals.reminders,
            shutdown_rx.clone(),
        )),
        tokio::spawn(sweep_loop(
            engine,
            SweepScope::PenaltiesOnly,
            intervals.penalties,
            shutdown_rx,
        )),
    ];

    crate::core::shutdown::broadcast_on_signal(shutdown_tx).await;

    for handle in handles {
        if let Err(err) = handle.await {
            tracing::error!(error = %err, "Sweep loop join failed");
        }
    }

    Ok(())
}

async fn sweep_loop(
    engine: GradingEngine,
    scope: SweepScope,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut tick = interval(period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tick.tick() => {
                if let Err(err) = engine.run_sweep(OffsetDateTime::now_utc(), scope).await {
                    tracing::error!(scope = scope.as_str(), error = %err, "Deadline sweep failed");
                }
            }
        }
    }

    tracing::info!(scope = scope.as_str(), "Sweep loop stopped");
}
