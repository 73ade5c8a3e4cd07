use camino::{Utf8Path, Utf8PathBuf};
use photomirror_core::{LocalEntry, PendingOrphans};
use photomirror_infra::hashing::{compute_file_checksum, HashError};
use std::fs;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("cannot open mirror root {path}: {source}")]
    Root {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("mirror root {0} is not a directory")]
    RootNotDir(Utf8PathBuf),
    #[error("error walking {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),
    #[error("{path} is not below {root}")]
    OutsideRoot { path: Utf8PathBuf, root: Utf8PathBuf },
    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScanStats {
    pub dirs_seen: u64,
    pub files_hashed: u64,
    pub bytes_hashed: u64,
}

pub type ProgressCb = Box<dyn Fn(ScanStats) + Send + Sync>;

pub struct Scanner;

impl Scanner {
    /// Index every path below `root`: directories become markers, everything
    /// else is hashed. The root itself is not part of the index.
    ///
    /// Any unreadable entry aborts the scan. Skipping it would make the file
    /// look absent, and absent files get deleted.
    pub fn index_directory(
        root: &Utf8Path,
        on_progress: Option<ProgressCb>,
    ) -> Result<(PendingOrphans, ScanStats), ScannerError> {
        info!("Scanning local file system at {}, this may take some time", root);

        let meta = fs::metadata(root).map_err(|source| ScannerError::Root {
            path: root.to_owned(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(ScannerError::RootNotDir(root.to_owned()));
        }

        let mut index = PendingOrphans::new();
        let mut stats = ScanStats::default();

        for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
            let entry = entry.map_err(|source| ScannerError::Walk {
                path: source
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.to_string()),
                source,
            })?;

            let fs_path = Utf8Path::from_path(entry.path())
                .ok_or_else(|| ScannerError::NonUtf8Path(entry.path().display().to_string()))?;
            let rel_path = Self::relative_key(root, fs_path)?;

            if entry.file_type().is_dir() {
                stats.dirs_seen += 1;
                index.insert(rel_path, LocalEntry::Directory);
            } else {
                let (digest, len) = compute_file_checksum(fs_path)?;
                debug!("{}: {}", rel_path, digest);
                stats.files_hashed += 1;
                stats.bytes_hashed += len;
                index.insert(rel_path, LocalEntry::ContentHash(digest));
            }

            if let Some(cb) = &on_progress {
                cb(stats.clone());
            }
        }

        info!(
            "Indexed {} files and {} directories",
            stats.files_hashed, stats.dirs_seen
        );
        Ok((index, stats))
    }

    /// `/`-joined path of `fs_path` relative to `root`, independent of the
    /// platform separator.
    fn relative_key(root: &Utf8Path, fs_path: &Utf8Path) -> Result<String, ScannerError> {
        let rel = fs_path
            .strip_prefix(root)
            .map_err(|_| ScannerError::OutsideRoot {
                path: fs_path.to_owned(),
                root: root.to_owned(),
            })?;
        Ok(rel
            .components()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("/"))
    }
}
