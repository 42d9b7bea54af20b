pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod repositories;
pub(crate) mod services;
pub(crate) mod tasks;

use crate::core::{config::Settings, state::AppState, telemetry};
use crate::services::answer_store::AnswerStoreClient;

pub async fn run_worker() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db_pool = db::init_pool(&settings).await?;
    db::run_migrations(&db_pool).await?;

    let store = AnswerStoreClient::from_settings(&settings)?;
    let state = AppState::new(settings, db_pool);

    tracing::info!(
        environment = %state.settings().runtime().environment.as_str(),
        answers_path = %state.settings().answer_store().answers_path,
        "examsync worker starting"
    );

    tasks::scheduler::run(state, store).await
}
