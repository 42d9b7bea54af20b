mod record;
mod worker;

pub(crate) use worker::{BatchStats, SyncWorker};
