use camino::Utf8Path;
use humansize::{format_size, BINARY};
use photomirror_core::path_utils::MirrorPath;
use photomirror_core::{ItemStatus, LocalEntry, PendingOrphans, RemoteItem};
use photomirror_infra::net::DownloadEvent;
use tokio::sync::mpsc::Sender;
use tracing::{info, warn};

use crate::sync::accounting::{ItemCounts, TransferTally};
use crate::sync::execute::{build_request, ItemFetcher};
use crate::sync::SyncError;

/// What happened to a single remote item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub path: String,
    pub status: ItemStatus,
    /// Bytes transferred, or the reported size under dry run. Zero when skipped.
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub items: ItemCounts,
    pub tally: TransferTally,
}

pub struct Reconciler<'a> {
    root: &'a Utf8Path,
    fetcher: &'a dyn ItemFetcher,
    dry_run: bool,
    progress_tx: Option<&'a Sender<DownloadEvent>>,
}

impl<'a> Reconciler<'a> {
    pub fn new(root: &'a Utf8Path, fetcher: &'a dyn ItemFetcher, dry_run: bool) -> Self {
        Self {
            root,
            fetcher,
            dry_run,
            progress_tx: None,
        }
    }

    pub fn with_progress(mut self, progress_tx: Option<&'a Sender<DownloadEvent>>) -> Self {
        self.progress_tx = progress_tx;
        self
    }

    /// Exact, case-sensitive hash comparison. Anything that is not an
    /// identical file at the mapped path needs a download.
    pub fn classify(pending: &PendingOrphans, path: &str, item: &RemoteItem) -> ItemStatus {
        match pending.get(path) {
            Some(LocalEntry::ContentHash(local)) if *local == item.checksum => ItemStatus::Unchanged,
            Some(_) => ItemStatus::Changed,
            None => ItemStatus::New,
        }
    }

    /// Nearest ancestor of `path` that is a regular file locally. The
    /// download cannot create its directory while that file is there.
    pub fn blocking_ancestor<'p>(pending: &PendingOrphans, path: &'p str) -> Option<&'p str> {
        MirrorPath::ancestors(path)
            .find(|a| matches!(pending.get(a), Some(LocalEntry::ContentHash(_))))
    }

    pub async fn reconcile_item(
        &self,
        item: &RemoteItem,
        pending: &mut PendingOrphans,
        report: &mut ReconcileReport,
    ) -> Result<ItemRecord, SyncError> {
        let path =
            MirrorPath::for_item(&item.position).map_err(|source| SyncError::Unmappable {
                item: format!("ID={} Key={}", item.id, item.key),
                album: item.position.collection.clone(),
                source,
            })?;

        let status = Self::classify(pending, &path, item);
        if pending.get(&path).is_some_and(LocalEntry::is_dir) {
            warn!("{} is a local directory but the server has a file there", path);
        }
        if let Some(file) = Self::blocking_ancestor(pending, &path) {
            warn!("{} is a local file but {} needs it to be a directory", file, path);
        }

        // Claim before any I/O: a half-written file must not look like an
        // orphan, and its directory must survive cleanup even under dry run.
        pending.claim(&path);
        report.items.record(status);

        if status == ItemStatus::Unchanged {
            info!("    skipping unchanged file {}", path);
            return Ok(ItemRecord {
                path,
                status,
                bytes: 0,
            });
        }

        if self.dry_run {
            info!("    {}: dry run, not downloading {}", path, status.label());
            report.tally.record(item.size);
            return Ok(ItemRecord {
                path,
                status,
                bytes: item.size,
            });
        }

        let req = build_request(self.root, &path, item);
        let written = self
            .fetcher
            .fetch(&req, self.progress_tx)
            .await
            .map_err(|source| SyncError::Download {
                path: path.clone(),
                source,
            })?;

        info!(
            "    {}: downloaded {} {}",
            path,
            format_size(written, BINARY),
            status.label()
        );
        report.tally.record(written);

        Ok(ItemRecord {
            path,
            status,
            bytes: written,
        })
    }
}
