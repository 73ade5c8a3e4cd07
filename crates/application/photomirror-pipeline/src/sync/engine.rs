use camino::Utf8Path;
use photomirror_core::{Album, PendingOrphans};
use photomirror_infra::net::{DownloadEvent, Downloader};
use photomirror_scanner::{ProgressCb, ScanStats, Scanner};
use std::time::Instant;
use tokio::sync::mpsc::Sender;
use tracing::info;

use crate::sync::cleanup::remove_orphans;
use crate::sync::execute::ItemFetcher;
use crate::sync::reconcile::{ReconcileReport, Reconciler};
use crate::sync::remote::{CatalogueProvider, Credentials, Session, SmugmugCatalogue};
use crate::sync::{MirrorRequest, MirrorResult, SyncError};

pub struct MirrorEngine {
    catalogue: Box<dyn CatalogueProvider>,
    fetcher: Box<dyn ItemFetcher>,
}

impl MirrorEngine {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Result<Self, SyncError> {
        let catalogue = Box::new(SmugmugCatalogue::new(client.clone(), endpoint)?);
        let fetcher = Box::new(Downloader::new(client));
        Ok(Self { catalogue, fetcher })
    }

    pub fn with_components(
        catalogue: Box<dyn CatalogueProvider>,
        fetcher: Box<dyn ItemFetcher>,
    ) -> Self {
        Self { catalogue, fetcher }
    }

    /// Step 1: Network only. Establish the session every later call needs.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, SyncError> {
        let session = self.catalogue.authenticate(credentials).await?;
        info!(
            "Logged in {}, NickName is {}",
            credentials.email, session.nick_name
        );
        Ok(session)
    }

    /// Step 2: Disk only. Hash everything under `root` on the blocking pool.
    pub async fn scan_local_state(
        &self,
        root: &Utf8Path,
        on_progress: Option<ProgressCb>,
    ) -> Result<(PendingOrphans, ScanStats), SyncError> {
        let root = root.to_owned();
        let (pending, stats) =
            tokio::task::spawn_blocking(move || Scanner::index_directory(&root, on_progress))
                .await
                .map_err(|e| SyncError::Task(format!("local scan: {e}")))??;
        info!("Found {} local files and directories", pending.len());
        Ok((pending, stats))
    }

    /// Step 3: Walk one album, downloading what is missing or stale and
    /// claiming every mapped path.
    pub async fn mirror_album(
        &self,
        session: &Session,
        album: &Album,
        reconciler: &Reconciler<'_>,
        pending: &mut PendingOrphans,
        report: &mut ReconcileReport,
    ) -> Result<(), SyncError> {
        match &album.url {
            Some(url) => info!(
                "Processing album {} in category {} [{}]",
                album.title, album.category, url
            ),
            None => info!(
                "Processing album {} in category {}",
                album.title, album.category
            ),
        }

        let items = self.catalogue.list_items(session, album).await?;
        for item in &items {
            reconciler.reconcile_item(item, pending, report).await?;
        }
        Ok(())
    }

    /// Full pass: index the local tree, login, reconcile every album in
    /// catalogue order, then remove what nothing claimed. A scan failure
    /// ends the run before any remote call. The first error ends the run;
    /// cleanup only happens after every album went through.
    pub async fn run(
        &self,
        req: &MirrorRequest,
        on_scan_progress: Option<ProgressCb>,
        progress_tx: Option<Sender<DownloadEvent>>,
    ) -> Result<MirrorResult, SyncError> {
        let started = Instant::now();
        let opts = req.options;

        let (mut pending, scan) = self
            .scan_local_state(&req.local_root, on_scan_progress)
            .await?;
        let session = self.login(&req.credentials).await?;

        let albums = self.catalogue.list_albums(&session).await?;
        info!("Found {} albums", albums.len());

        let reconciler = Reconciler::new(&req.local_root, self.fetcher.as_ref(), opts.dry_run)
            .with_progress(progress_tx.as_ref());
        let mut report = ReconcileReport::default();

        for album in &albums {
            self.mirror_album(&session, album, &reconciler, &mut pending, &mut report)
                .await?;
        }

        let cleanup = remove_orphans(pending, &req.local_root, &opts).await?;

        Ok(MirrorResult {
            scan,
            albums: albums.len(),
            items: report.items,
            tally: report.tally,
            cleanup,
            elapsed: started.elapsed(),
            dry_run: opts.dry_run,
        })
    }
}
