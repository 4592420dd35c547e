use std::sync::Arc;

use dashmap::DashMap;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::storage::paths::UploadStorage;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub storage: UploadStorage,
    /// Per-participant locks serializing the count-then-write step of the
    /// upload pipeline, so two concurrent uploads cannot claim the same
    /// sequential filename.
    pub upload_locks: Arc<DashMap<i32, Arc<Mutex<()>>>>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let storage = UploadStorage::new(&config.storage.uploads_root);
        Self {
            db,
            config,
            storage,
            upload_locks: Arc::new(DashMap::new()),
        }
    }

    /// Lock guarding sequential-filename assignment for one participant.
    pub fn upload_lock(&self, participant_id: i32) -> Arc<Mutex<()>> {
        self.upload_locks
            .entry(participant_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry for a participant that no longer exists, so the
    /// map does not grow past the live participant set.
    pub fn release_upload_lock(&self, participant_id: i32) {
        self.upload_locks.remove(&participant_id);
    }
}
