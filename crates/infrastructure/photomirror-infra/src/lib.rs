pub mod hashing;
pub mod net;

// Re-exports for convenience
pub use hashing::{compute_file_checksum, HashError};
pub use net::{
    default_http_client, DownloadError, DownloadEvent, DownloadRequest, Downloader,
};
