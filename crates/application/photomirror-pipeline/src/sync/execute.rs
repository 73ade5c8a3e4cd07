use camino::Utf8Path;
use photomirror_core::RemoteItem;
use photomirror_infra::net::{DownloadError, DownloadEvent, DownloadRequest, Downloader};
use tokio::sync::mpsc::Sender;

/// Raw byte transfer of one remote resource.
#[async_trait::async_trait]
pub trait ItemFetcher: Send + Sync {
    async fn fetch(
        &self,
        req: &DownloadRequest,
        progress_tx: Option<&Sender<DownloadEvent>>,
    ) -> Result<u64, DownloadError>;
}

#[async_trait::async_trait]
impl ItemFetcher for Downloader {
    async fn fetch(
        &self,
        req: &DownloadRequest,
        progress_tx: Option<&Sender<DownloadEvent>>,
    ) -> Result<u64, DownloadError> {
        self.download(req, progress_tx).await
    }
}

/// `rel_path` must come from `MirrorPath::for_item`, which already refuses
/// anything that could escape `root`.
pub fn build_request(root: &Utf8Path, rel_path: &str, item: &RemoteItem) -> DownloadRequest {
    DownloadRequest {
        id: item.id,
        url: item.url.clone(),
        target_path: root.join(rel_path),
        expected_size: item.size,
    }
}
