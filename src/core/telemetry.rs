use anyhow::anyhow;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::Settings;

/// Installs the worker's global subscriber. `RUST_LOG` overrides the configured level,
/// which otherwise applies with sqlx held at `warn`.
pub(crate) fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let telemetry = settings.telemetry();
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("{},sqlx=warn", telemetry.log_level))
            .map_err(|err| anyhow!("invalid log level {:?}: {err}", telemetry.log_level))?,
    };

    let builder = fmt().with_env_filter(filter).with_target(telemetry.json);
    let installed = if telemetry.json {
        builder.json().flatten_event(true).with_current_span(false).try_init()
    } else {
        builder.compact().try_init()
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
