use camino::Utf8Path;
use photomirror_core::PendingOrphans;
use tracing::info;

use crate::sync::{MirrorOptions, SyncError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub files_removed: u64,
    pub dirs_removed: u64,
    /// Orphans left on disk because deletion was disabled.
    pub orphans_kept: u64,
    pub dry_run: bool,
}

impl CleanupReport {
    pub fn total_removed(&self) -> u64 {
        self.files_removed + self.dirs_removed
    }
}

/// Delete every path the remote pass never claimed: files first, then
/// directories from the deepest up.
///
/// Stops at the first failure. A directory that is not empty at this point
/// held something the index never saw, which needs a human to look at it.
pub async fn remove_orphans(
    pending: PendingOrphans,
    root: &Utf8Path,
    opts: &MirrorOptions,
) -> Result<CleanupReport, SyncError> {
    let mut report = CleanupReport {
        dry_run: opts.dry_run,
        ..CleanupReport::default()
    };

    if !opts.delete {
        report.orphans_kept = pending.len() as u64;
        if !pending.is_empty() {
            info!(
                "deletion disabled, leaving {} local paths not found on server",
                pending.len()
            );
        }
        return Ok(report);
    }

    let batches = pending.into_batches();

    for rel in &batches.files {
        if opts.dry_run {
            info!("dry run, not removing file {}", rel);
        } else {
            let path = root.join(rel);
            tokio::fs::remove_file(path.as_std_path())
                .await
                .map_err(|e| SyncError::cleanup("file", &path, e))?;
            info!("removed file {}", rel);
        }
        report.files_removed += 1;
    }

    for rel in &batches.dirs {
        if opts.dry_run {
            info!("dry run, not removing directory {}", rel);
        } else {
            let path = root.join(rel);
            tokio::fs::remove_dir(path.as_std_path())
                .await
                .map_err(|e| SyncError::cleanup("directory", &path, e))?;
            info!("removed directory {}", rel);
        }
        report.dirs_removed += 1;
    }

    info!("removed {} files and directories", report.total_removed());
    Ok(report)
}
