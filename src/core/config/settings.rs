use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_duplicate_policy, parse_environment, parse_u16,
    parse_u64,
};
use super::types::{
    AnswerStoreSettings, ConfigError, DatabaseSettings, RuntimeSettings, Settings,
    TelemetrySettings, WorkerSettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let environment =
            parse_environment(env_optional("EXAMSYNC_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("EXAMSYNC_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "examsync");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "examination_system");
        let database_url = env_optional("DATABASE_URL");

        let store_base_url = env_or_default("ANSWER_STORE_URL", "");
        let answers_path = env_or_default("ANSWER_STORE_ANSWERS_PATH", "student_answers");
        let store_timeout_seconds = parse_u64(
            "ANSWER_STORE_TIMEOUT_SECONDS",
            env_or_default("ANSWER_STORE_TIMEOUT_SECONDS", "30"),
        )?;

        let poll_interval_seconds = parse_u64(
            "SYNC_POLL_INTERVAL_SECONDS",
            env_or_default("SYNC_POLL_INTERVAL_SECONDS", "3"),
        )?;
        let backoff_seconds =
            parse_u64("SYNC_BACKOFF_SECONDS", env_or_default("SYNC_BACKOFF_SECONDS", "10"))?;
        let duplicate_policy = parse_duplicate_policy(env_optional("SYNC_DUPLICATE_POLICY"))?;

        let log_level = env_or_default("EXAMSYNC_LOG_LEVEL", "info");
        let json =
            env_optional("EXAMSYNC_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_addr = env_or_default("PROMETHEUS_ADDR", "127.0.0.1:9464");

        let settings = Self {
            runtime: RuntimeSettings { environment, strict_config },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
            },
            answer_store: AnswerStoreSettings {
                base_url: store_base_url,
                answers_path,
                timeout_seconds: store_timeout_seconds,
            },
            worker: WorkerSettings { poll_interval_seconds, backoff_seconds, duplicate_policy },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled, prometheus_addr },
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

    pub(crate) fn answer_store(&self) -> &AnswerStoreSettings {
        &self.answer_store
    }

    pub(crate) fn worker(&self) -> &WorkerSettings {
        &self.worker
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.answer_store.base_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("ANSWER_STORE_URL"));
        }

        if self.answer_store.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ANSWER_STORE_TIMEOUT_SECONDS",
                value: "0".to_string(),
            });
        }

        if self.worker.poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "SYNC_POLL_INTERVAL_SECONDS",
                value: "0".to_string(),
            });
        }

        if self.worker.backoff_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "SYNC_BACKOFF_SECONDS",
                value: "0".to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }

        Ok(())
    }
}
