use camino::{Utf8Path, Utf8PathBuf};
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Instant;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::Sender;
use tracing::debug;

const PROGRESS_BYTES: u64 = 1_000_000;
const PROGRESS_MILLIS: u128 = 100;

/// HTTP client shared by the catalogue API and image downloads.
pub fn default_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("photomirror/", env!("CARGO_PKG_VERSION")))
        .build()
}

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub id: u64,
    pub url: String,
    pub target_path: Utf8PathBuf,
    pub expected_size: u64,
}

#[derive(Debug)]
pub enum DownloadEvent {
    Started { id: u64, total_bytes: u64 },
    Progress { id: u64, bytes_delta: u64 },
    Completed { id: u64, success: bool },
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("error downloading {url}: {source}")]
    Transfer {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected status code downloading {url}: {status}")]
    HttpStatus { url: String, status: StatusCode },
    #[error("downloaded {actual} bytes from {url}, expected {expected}")]
    SizeMismatch {
        url: String,
        expected: u64,
        actual: u64,
    },
    #[error("error saving file {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fetches a single resource to disk. Does NOT decide what to fetch.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Stream `req.url` straight into `req.target_path` and check the byte
    /// count against `req.expected_size`.
    ///
    /// A failed transfer leaves whatever was written in place. Its content
    /// hash will not match on the next run, so it gets fetched again.
    pub async fn download(
        &self,
        req: &DownloadRequest,
        progress_tx: Option<&Sender<DownloadEvent>>,
    ) -> Result<u64, DownloadError> {
        if let Some(t) = progress_tx {
            let _ = t
                .send(DownloadEvent::Started {
                    id: req.id,
                    total_bytes: req.expected_size,
                })
                .await;
        }

        let res = self.download_inner(req, progress_tx).await;

        if let Some(t) = progress_tx {
            let _ = t
                .send(DownloadEvent::Completed {
                    id: req.id,
                    success: res.is_ok(),
                })
                .await;
        }

        res
    }

    async fn download_inner(
        &self,
        req: &DownloadRequest,
        progress_tx: Option<&Sender<DownloadEvent>>,
    ) -> Result<u64, DownloadError> {
        let resp = self
            .client
            .get(&req.url)
            .send()
            .await
            .map_err(|source| DownloadError::Transfer {
                url: req.url.clone(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(DownloadError::HttpStatus {
                url: req.url.clone(),
                status: resp.status(),
            });
        }

        if let Some(parent) = req.target_path.parent() {
            tokio::fs::create_dir_all(parent.as_std_path())
                .await
                .map_err(io_err(parent))?;
        }

        let mut file = File::create(req.target_path.as_std_path())
            .await
            .map_err(io_err(&req.target_path))?;

        let mut stream = resp.bytes_stream();
        let mut total_written = 0u64;
        let mut accumulated = 0u64;
        let mut last_emit = Instant::now();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| DownloadError::Transfer {
                url: req.url.clone(),
                source,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(io_err(&req.target_path))?;

            let len = chunk.len() as u64;
            total_written += len;
            accumulated += len;

            if accumulated > PROGRESS_BYTES || last_emit.elapsed().as_millis() > PROGRESS_MILLIS {
                emit_progress(progress_tx, req.id, accumulated).await;
                accumulated = 0;
                last_emit = Instant::now();
            }
        }
        if accumulated > 0 {
            emit_progress(progress_tx, req.id, accumulated).await;
        }

        file.flush().await.map_err(io_err(&req.target_path))?;

        debug!("{}: wrote {} bytes", req.target_path, total_written);

        if total_written != req.expected_size {
            return Err(DownloadError::SizeMismatch {
                url: req.url.clone(),
                expected: req.expected_size,
                actual: total_written,
            });
        }

        Ok(total_written)
    }
}

async fn emit_progress(tx: Option<&Sender<DownloadEvent>>, id: u64, bytes_delta: u64) {
    if let Some(t) = tx {
        let _ = t.send(DownloadEvent::Progress { id, bytes_delta }).await;
    }
}

fn io_err(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> DownloadError {
    let path = path.to_owned();
    move |source| DownloadError::Io { path, source }
}
