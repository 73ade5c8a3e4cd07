use camino::Utf8Path;
use photomirror_core::{HierarchyPosition, ItemStatus, LocalEntry, PendingOrphans, RemoteItem};
use photomirror_infra::net::{DownloadError, DownloadEvent, DownloadRequest};
use photomirror_pipeline::sync::execute::ItemFetcher;
use photomirror_pipeline::sync::reconcile::{ReconcileReport, Reconciler};
use photomirror_pipeline::SyncError;
use std::sync::Mutex;
use tokio::sync::mpsc::Sender;

#[derive(Default)]
struct RecordingFetcher {
    requests: Mutex<Vec<DownloadRequest>>,
}

impl RecordingFetcher {
    fn requested(&self) -> Vec<DownloadRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ItemFetcher for RecordingFetcher {
    async fn fetch(
        &self,
        req: &DownloadRequest,
        _progress_tx: Option<&Sender<DownloadEvent>>,
    ) -> Result<u64, DownloadError> {
        self.requests.lock().unwrap().push(req.clone());
        Ok(req.expected_size)
    }
}

struct FailingFetcher;

#[async_trait::async_trait]
impl ItemFetcher for FailingFetcher {
    async fn fetch(
        &self,
        req: &DownloadRequest,
        _progress_tx: Option<&Sender<DownloadEvent>>,
    ) -> Result<u64, DownloadError> {
        Err(DownloadError::SizeMismatch {
            url: req.url.clone(),
            expected: req.expected_size,
            actual: 3,
        })
    }
}

fn oak(checksum: &str) -> RemoteItem {
    RemoteItem {
        id: 7,
        key: "oakKey".into(),
        position: HierarchyPosition {
            group: "Nature".into(),
            subgroup: None,
            collection: "Trees".into(),
            filename: "oak.jpg".into(),
        },
        checksum: checksum.into(),
        size: 1000,
        url: "https://photos.example.com/oak.jpg".into(),
    }
}

fn root() -> &'static Utf8Path {
    Utf8Path::new("/mirror")
}

#[tokio::test]
async fn new_item_is_downloaded_to_mapped_path() {
    let fetcher = RecordingFetcher::default();
    let reconciler = Reconciler::new(root(), &fetcher, false);
    let mut pending = PendingOrphans::new();
    let mut report = ReconcileReport::default();

    let record = reconciler
        .reconcile_item(&oak("abc123"), &mut pending, &mut report)
        .await
        .unwrap();

    assert_eq!(record.path, "Nature/Trees/oak.jpg");
    assert_eq!(record.status, ItemStatus::New);
    assert_eq!(report.tally.files, 1);
    assert_eq!(report.tally.bytes, 1000);
    assert_eq!(report.items.new, 1);

    let requested = fetcher.requested();
    assert_eq!(requested.len(), 1);
    assert_eq!(requested[0].target_path, "/mirror/Nature/Trees/oak.jpg");
}

#[tokio::test]
async fn matching_hash_is_skipped_and_branch_claimed() {
    let fetcher = RecordingFetcher::default();
    let reconciler = Reconciler::new(root(), &fetcher, false);
    let mut pending: PendingOrphans = [
        ("Nature".to_string(), LocalEntry::Directory),
        ("Nature/Trees".to_string(), LocalEntry::Directory),
        (
            "Nature/Trees/oak.jpg".to_string(),
            LocalEntry::ContentHash("abc123".into()),
        ),
    ]
    .into_iter()
    .collect();
    let mut report = ReconcileReport::default();

    let record = reconciler
        .reconcile_item(&oak("abc123"), &mut pending, &mut report)
        .await
        .unwrap();

    assert_eq!(record.status, ItemStatus::Unchanged);
    assert_eq!(record.bytes, 0);
    assert!(pending.is_empty());
    assert!(fetcher.requested().is_empty());
    assert_eq!(report.tally.files, 0);
    assert_eq!(report.items.unchanged, 1);
}

#[tokio::test]
async fn stale_hash_is_changed_and_refetched() {
    let fetcher = RecordingFetcher::default();
    let reconciler = Reconciler::new(root(), &fetcher, false);
    let mut pending: PendingOrphans = [(
        "Nature/Trees/oak.jpg".to_string(),
        LocalEntry::ContentHash("ffff".into()),
    )]
    .into_iter()
    .collect();
    let mut report = ReconcileReport::default();

    let record = reconciler
        .reconcile_item(&oak("abc123"), &mut pending, &mut report)
        .await
        .unwrap();

    assert_eq!(record.status, ItemStatus::Changed);
    assert!(pending.get("Nature/Trees/oak.jpg").is_none());
    assert_eq!(fetcher.requested().len(), 1);
    assert_eq!(report.items.changed, 1);
}

#[tokio::test]
async fn hash_comparison_is_case_sensitive() {
    let pending: PendingOrphans = [(
        "Nature/Trees/oak.jpg".to_string(),
        LocalEntry::ContentHash("abc123".into()),
    )]
    .into_iter()
    .collect();

    let status = Reconciler::classify(&pending, "Nature/Trees/oak.jpg", &oak("ABC123"));
    assert_eq!(status, ItemStatus::Changed);
}

#[tokio::test]
async fn directory_at_item_path_counts_as_changed() {
    let pending: PendingOrphans = [("Nature/Trees/oak.jpg".to_string(), LocalEntry::Directory)]
        .into_iter()
        .collect();

    let status = Reconciler::classify(&pending, "Nature/Trees/oak.jpg", &oak("abc123"));
    assert_eq!(status, ItemStatus::Changed);
}

#[tokio::test]
async fn dry_run_tallies_reported_size_without_fetching() {
    let fetcher = RecordingFetcher::default();
    let reconciler = Reconciler::new(root(), &fetcher, true);
    let mut pending: PendingOrphans = [("Nature".to_string(), LocalEntry::Directory)]
        .into_iter()
        .collect();
    let mut report = ReconcileReport::default();

    let record = reconciler
        .reconcile_item(&oak("abc123"), &mut pending, &mut report)
        .await
        .unwrap();

    assert_eq!(record.status, ItemStatus::New);
    assert_eq!(record.bytes, 1000);
    assert!(fetcher.requested().is_empty());
    assert_eq!(report.tally.files, 1);
    assert_eq!(report.tally.bytes, 1000);
    // The ancestor is protected even though nothing was written.
    assert!(pending.is_empty());
}

#[tokio::test]
async fn unmappable_item_is_fatal() {
    let fetcher = RecordingFetcher::default();
    let reconciler = Reconciler::new(root(), &fetcher, false);
    let mut pending = PendingOrphans::new();
    let mut report = ReconcileReport::default();

    let mut item = oak("abc123");
    item.position.filename.clear();

    let err = reconciler
        .reconcile_item(&item, &mut pending, &mut report)
        .await
        .unwrap_err();

    match err {
        SyncError::Unmappable { item, album, .. } => {
            assert!(item.contains("ID=7"));
            assert_eq!(album, "Trees");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(fetcher.requested().is_empty());
    assert_eq!(report.items.total(), 0);
}

#[tokio::test]
async fn failed_transfer_is_wrapped_with_path() {
    let reconciler = Reconciler::new(root(), &FailingFetcher, false);
    let mut pending = PendingOrphans::new();
    let mut report = ReconcileReport::default();

    let err = reconciler
        .reconcile_item(&oak("abc123"), &mut pending, &mut report)
        .await
        .unwrap_err();

    match err {
        SyncError::Download { path, source } => {
            assert_eq!(path, "Nature/Trees/oak.jpg");
            assert!(matches!(source, DownloadError::SizeMismatch { actual: 3, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(report.tally.files, 0);
}

#[test]
fn local_file_in_place_of_a_parent_directory_is_found() {
    let pending: PendingOrphans = [
        ("Nature".to_string(), LocalEntry::ContentHash("feed".into())),
        ("Sky".to_string(), LocalEntry::Directory),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        Reconciler::blocking_ancestor(&pending, "Nature/Trees/oak.jpg"),
        Some("Nature")
    );
    assert_eq!(Reconciler::blocking_ancestor(&pending, "Sky/Clouds/cirrus.jpg"), None);
    assert_eq!(Reconciler::blocking_ancestor(&pending, "Nature"), None);
}

#[tokio::test]
async fn local_file_in_place_of_a_parent_directory_is_not_an_orphan() {
    let fetcher = RecordingFetcher::default();
    let reconciler = Reconciler::new(root(), &fetcher, false);
    let mut pending: PendingOrphans =
        [("Nature".to_string(), LocalEntry::ContentHash("feed".into()))]
            .into_iter()
            .collect();
    let mut report = ReconcileReport::default();

    let record = reconciler
        .reconcile_item(&oak("abc123"), &mut pending, &mut report)
        .await
        .unwrap();

    assert_eq!(record.status, ItemStatus::New);
    assert!(pending.is_empty());
    assert_eq!(fetcher.requested().len(), 1);
}
