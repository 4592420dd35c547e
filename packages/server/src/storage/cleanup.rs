use std::path::Path;

use serde::Serialize;
use tracing::warn;

use super::paths::UploadStorage;

/// Outcome of a best-effort disk cleanup. Disk failures never block the
/// relational delete; they are collected here so callers and tests can see
/// what actually happened.
#[derive(Debug, Default, Serialize, utoipa::ToSchema)]
pub struct CleanupReport {
    /// Files found and removed.
    pub files_removed: u32,
    /// Files no store row pointed at any existing path for.
    pub files_missing: u32,
    /// Disk errors that were swallowed, as display strings.
    pub errors: Vec<String>,
}

/// Delete one upload's file, trying the four candidate locations in order.
/// Returns whether a file was actually removed from disk.
pub async fn remove_upload_file(
    storage: &UploadStorage,
    code: &str,
    participant_id: i32,
    stored_filename: &str,
) -> bool {
    let Some(path) = storage.first_existing(code, participant_id, stored_filename).await else {
        return false;
    };
    match tokio::fs::remove_file(&path).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to remove upload file {}: {}", path.display(), e);
            false
        }
    }
}

/// Remove all of a participant's files from disk ahead of the relational
/// cascade, then prune the participant's now-empty folders in both the
/// code-keyed and legacy id-keyed trees.
pub async fn remove_participant_tree(
    storage: &UploadStorage,
    code: &str,
    participant_id: i32,
    stored_filenames: &[String],
) -> CleanupReport {
    let mut report = CleanupReport::default();

    for name in stored_filenames {
        match storage.first_existing(code, participant_id, name).await {
            Some(path) => match tokio::fs::remove_file(&path).await {
                Ok(()) => report.files_removed += 1,
                Err(e) => {
                    warn!("Failed to remove {}: {}", path.display(), e);
                    report.errors.push(format!("{}: {}", path.display(), e));
                }
            },
            None => report.files_missing += 1,
        }
    }

    for key in [code.to_string(), participant_id.to_string()] {
        prune_folder(storage, &key, &mut report).await;
    }

    report
}

/// Remove `<key>/images/` if empty, then `<key>/` if empty.
async fn prune_folder(storage: &UploadStorage, key: &str, report: &mut CleanupReport) {
    remove_dir_if_empty(&storage.canonical_dir(key), report).await;
    remove_dir_if_empty(&storage.base_dir(key), report).await;
}

async fn remove_dir_if_empty(dir: &Path, report: &mut CleanupReport) {
    // Non-empty or unreadable folders are left alone.
    if dir_is_empty(dir).await == Some(true)
        && let Err(e) = tokio::fs::remove_dir(dir).await
    {
        warn!("Failed to prune folder {}: {}", dir.display(), e);
        report.errors.push(format!("{}: {}", dir.display(), e));
    }
}

/// `Some(true)` if the directory exists and has no entries, `Some(false)` if
/// it has entries, `None` if it does not exist or cannot be read.
async fn dir_is_empty(dir: &Path) -> Option<bool> {
    let mut entries = tokio::fs::read_dir(dir).await.ok()?;
    match entries.next_entry().await {
        Ok(Some(_)) => Some(false),
        Ok(None) => Some(true),
        Err(_) => None,
    }
}
