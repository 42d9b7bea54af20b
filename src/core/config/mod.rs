mod parsing;
mod settings;
mod types;

pub(crate) use types::{
    AnswerStoreSettings, ConfigError, DatabaseSettings, DuplicatePolicy, Environment,
    RuntimeSettings, Settings, TelemetrySettings, WorkerSettings,
};
