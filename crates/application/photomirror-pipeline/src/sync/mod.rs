use camino::{Utf8Path, Utf8PathBuf};
use photomirror_core::path_utils::PathError;
use photomirror_infra::net::DownloadError;
use photomirror_scanner::{ScanStats, ScannerError};
use std::time::Duration;

pub mod accounting;
pub mod cleanup;
pub mod engine;
pub mod execute;
pub mod reconcile;
pub mod remote;

pub use accounting::{ItemCounts, TransferTally};
pub use cleanup::CleanupReport;
pub use engine::MirrorEngine;
pub use remote::{CatalogueProvider, Credentials, RemoteError, Session, SmugmugCatalogue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorOptions {
    /// Classify and report only; no transfers, no deletions.
    pub dry_run: bool,
    /// Remove local paths the catalogue no longer references.
    pub delete: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            delete: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MirrorRequest {
    pub credentials: Credentials,
    pub local_root: Utf8PathBuf,
    pub options: MirrorOptions,
}

#[derive(Debug, Clone)]
pub struct MirrorResult {
    pub scan: ScanStats,
    pub albums: usize,
    pub items: ItemCounts,
    pub tally: TransferTally,
    pub cleanup: CleanupReport,
    pub elapsed: Duration,
    pub dry_run: bool,
}

impl MirrorResult {
    pub fn summary_line(&self) -> String {
        accounting::format_summary(&self.tally, self.elapsed, self.dry_run)
    }
}

/// High-level error type for mirror runs. Every variant is fatal.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("error walking local file system: {0}")]
    Scan(#[from] ScannerError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("error processing image {item} from album {album}: {source}")]
    Unmappable {
        item: String,
        album: String,
        #[source]
        source: PathError,
    },
    #[error("error processing image {path}: {source}")]
    Download {
        path: String,
        #[source]
        source: DownloadError,
    },
    #[error("error removing {kind} {path}: {source}")]
    Cleanup {
        kind: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("background task failed: {0}")]
    Task(String),
}

impl SyncError {
    pub(crate) fn cleanup(kind: &'static str, path: &Utf8Path, source: std::io::Error) -> Self {
        SyncError::Cleanup {
            kind,
            path: path.to_owned(),
            source,
        }
    }
}

/// Convenience constructor for the default engine.
pub fn default_engine(
    client: reqwest::Client,
    endpoint: &str,
) -> Result<MirrorEngine, SyncError> {
    MirrorEngine::new(client, endpoint)
}
