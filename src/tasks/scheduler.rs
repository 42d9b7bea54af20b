use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use crate::core::state::AppState;
use crate::services::answer_store::{AnswerStoreClient, StoreError};
use crate::services::grading::ModelAnswerCache;
use crate::tasks::sync::{BatchStats, SyncWorker};

pub(crate) async fn run(state: AppState, store: AnswerStoreClient) -> Result<()> {
    // One-shot load; without the cache nothing can be graded, so failure
    // here aborts startup.
    let model_answers =
        ModelAnswerCache::load(state.db()).await.context("Failed to load the model answer cache")?;

    tracing::info!(
        model_answers = model_answers.len(),
        duplicate_policy = state.settings().worker().duplicate_policy.as_str(),
        "Model answer cache loaded"
    );

    let worker = SyncWorker::new(model_answers, state.settings().worker().duplicate_policy);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(sync_loop(state.clone(), store, worker, shutdown_rx));

    crate::core::shutdown::shutdown_signal().await;
    if shutdown_tx.send(true).is_err() {
        tracing::warn!("Failed to broadcast shutdown signal to the sync loop");
    }

    if let Err(err) = handle.await {
        tracing::error!(error = %err, "Sync loop join failed");
    }

    Ok(())
}

async fn sync_loop(
    state: AppState,
    store: AnswerStoreClient,
    mut worker: SyncWorker,
    mut shutdown: watch::Receiver<bool>,
) {
    let poll_interval = Duration::from_secs(state.settings().worker().poll_interval_seconds);
    let backoff = Duration::from_secs(state.settings().worker().backoff_seconds);

    loop {
        if *shutdown.borrow() {
            break;
        }

        let wait = match run_cycle(&state, &store, &mut worker).await {
            Ok(stats) => {
                if stats != BatchStats::default() {
                    tracing::info!(
                        synced = stats.synced,
                        malformed = stats.malformed,
                        duplicates = stats.duplicates,
                        "Processed new answer records"
                    );
                }
                poll_interval
            }
            Err(err) => {
                let kind = failure_kind(&err);
                tracing::error!(error = %err, kind, "Answer sync cycle failed; backing off");
                metrics::counter!("sync_failures_total", "kind" => kind).increment(1);
                backoff
            }
        };

        tokio::select! {
            _ = shutdown.changed() => break,
            _ = sleep(wait) => {}
        }
    }

    tracing::info!("Answer sync loop stopped");
}

async fn run_cycle(
    state: &AppState,
    store: &AnswerStoreClient,
    worker: &mut SyncWorker,
) -> Result<BatchStats> {
    let snapshot =
        store.fetch_answers().await.context("Failed to fetch the raw answer snapshot")?;

    if snapshot.is_empty() {
        return Ok(BatchStats::default());
    }

    worker.process_snapshot(state.db(), &snapshot).await
}

fn failure_kind(err: &anyhow::Error) -> &'static str {
    if err.chain().any(|cause| cause.downcast_ref::<sqlx::Error>().is_some()) {
        "database"
    } else if err.chain().any(|cause| cause.downcast_ref::<StoreError>().is_some()) {
        "store"
    } else {
        "unexpected"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_database_failures() {
        let err = anyhow::Error::from(sqlx::Error::RowNotFound)
            .context("Failed to persist answer record key1");
        assert_eq!(failure_kind(&err), "database");
    }

    #[test]
    fn classifies_store_failures() {
        let err = anyhow::Error::from(StoreError::MissingKey { path: "student_answers".into() })
            .context("Failed to fetch the raw answer snapshot");
        assert_eq!(failure_kind(&err), "store");
    }

    #[test]
    fn other_failures_are_unexpected() {
        assert_eq!(failure_kind(&anyhow::anyhow!("boom")), "unexpected");
    }
}
