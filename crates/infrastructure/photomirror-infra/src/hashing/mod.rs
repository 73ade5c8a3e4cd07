use camino::{Utf8Path, Utf8PathBuf};
use md5::Context;
use photomirror_core::Md5Digest;
use std::fs::File;
use std::io::{BufReader, Read};

const READ_BUF: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("error opening {path}: {source}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error reading {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lowercase hex MD5 of the whole file, streamed so large originals never
/// sit in memory. Returns the digest and the number of bytes hashed.
pub fn compute_file_checksum(fs_path: &Utf8Path) -> Result<(Md5Digest, u64), HashError> {
    let file = File::open(fs_path).map_err(|source| HashError::Open {
        path: fs_path.to_owned(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut hasher = Context::new();
    let mut buf = vec![0u8; READ_BUF];
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf).map_err(|source| HashError::Read {
            path: fs_path.to_owned(),
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.consume(&buf[..n]);
        total += n as u64;
    }

    Ok((format!("{:x}", hasher.finalize()), total))
}
