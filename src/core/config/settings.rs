use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_environment, parse_socket_addr, parse_u16,
    parse_u32, parse_u64,
};
use super::types::{
    ConfigError, DatabaseSettings, NotificationSettings, RuntimeSettings, Settings, SweepSettings,
    TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let environment = parse_environment(
            env_optional("UNIGRADE_ENV").or_else(|| env_optional("ENVIRONMENT")),
        );
        let strict_config =
            env_optional("UNIGRADE_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "unigrade");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "unigrade");
        let database_url = env_optional("DATABASE_URL");
        let max_connections = parse_u32(
            "DATABASE_MAX_CONNECTIONS",
            env_or_default("DATABASE_MAX_CONNECTIONS", "10"),
        )?;

        let log_level = env_or_default("UNIGRADE_LOG_LEVEL", "info");
        let json = env_optional("UNIGRADE_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_addr =
            parse_socket_addr("PROMETHEUS_ADDR", env_or_default("PROMETHEUS_ADDR", "0.0.0.0:9000"))?;

        let reminder_interval_seconds = parse_u64(
            "REMINDER_INTERVAL_SECONDS",
            env_or_default("REMINDER_INTERVAL_SECONDS", "86400"),
        )?;
        let penalty_interval_seconds = parse_u64(
            "PENALTY_INTERVAL_SECONDS",
            env_or_default("PENALTY_INTERVAL_SECONDS", "3600"),
        )?;

        let webhook_url = env_optional("NOTIFY_WEBHOOK_URL");
        let from_address = env_or_default("NOTIFY_FROM", "no-reply@unigrade.local");
        let timeout_seconds =
            parse_u64("NOTIFY_TIMEOUT_SECONDS", env_or_default("NOTIFY_TIMEOUT_SECONDS", "10"))?;

        let settings = Self {
            runtime: RuntimeSettings { environment, strict_config },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
                max_connections,
            },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled, prometheus_addr },
            sweep: SweepSettings { reminder_interval_seconds, penalty_interval_seconds },
            notifications: NotificationSettings { webhook_url, from_address, timeout_seconds },
        };

        settings.validate()?;

        Ok(settings)
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn sweep(&self) -> &SweepSettings {
        &self.sweep
    }

    pub(crate) fn notifications(&self) -> &NotificationSettings {
        &self.notifications
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.reminder_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "REMINDER_INTERVAL_SECONDS",
                value: "0".to_string(),
            });
        }

        if self.sweep.penalty_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "PENALTY_INTERVAL_SECONDS",
                value: "0".to_string(),
            });
        }

        if self.notifications.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "NOTIFY_TIMEOUT_SECONDS",
                value: "0".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        if self.notifications.webhook_url.is_none() {
            return Err(ConfigError::MissingSecret("NOTIFY_WEBHOOK_URL"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Environment;

    fn base_settings() -> Settings {
        Settings {
            runtime: RuntimeSettings { environment: Environment::Test, strict_config: false },
            database: DatabaseSettings {
                postgres_server: "localhost".to_string(),
                postgres_port: 5432,
                postgres_user: "unigrade".to_string(),
                postgres_password: String::new(),
                postgres_db: "unigrade".to_string(),
                database_url: None,
                max_connections: 10,
            },
            telemetry: TelemetrySettings {
                log_level: "info".to_string(),
                json: false,
                prometheus_enabled: false,
                prometheus_addr: "0.0.0.0:9000".parse().expect("addr"),
            },
            sweep: SweepSettings { reminder_interval_seconds: 86400, penalty_interval_seconds: 3600 },
            notifications: NotificationSettings {
                webhook_url: None,
                from_address: "no-reply@unigrade.local".to_string(),
                timeout_seconds: 10,
            },
        }
    }

    #[test]
    fn relaxed_mode_accepts_defaults() {
        base_settings().validate().expect("defaults are valid outside production");
    }

    #[test]
    fn zero_penalty_interval_is_rejected() {
        let mut settings = base_settings();
        settings.sweep.penalty_interval_seconds = 0;
        let err = settings.validate().expect_err("zero interval");
        assert!(matches!(err, ConfigError::InvalidValue { field: "PENALTY_INTERVAL_SECONDS", .. }));
    }

    #[test]
    fn strict_mode_requires_database_password_and_webhook() {
        let mut settings = base_settings();
        settings.runtime.strict_config = true;
        let err = settings.validate().expect_err("missing password");
        assert!(matches!(err, ConfigError::MissingSecret("POSTGRES_PASSWORD")));

        settings.database.database_url = Some("postgresql://u:p@db/unigrade".to_string());
        let err = settings.validate().expect_err("missing webhook");
        assert!(matches!(err, ConfigError::MissingSecret("NOTIFY_WEBHOOK_URL")));

        settings.notifications.webhook_url = Some("https://mail.example.edu/hook".to_string());
        settings.validate().expect("strict settings complete");
    }
}
