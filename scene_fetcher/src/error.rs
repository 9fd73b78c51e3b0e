use std::path::PathBuf;

use crate::Sha256Hash;

/// Failure to make a scene available on disk.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("failed to download '{url}' to '{}'", path.display())]
    Download {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sha256 mismatch for archive downloaded from '{url}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: Sha256Hash,
        actual: Sha256Hash,
    },

    #[error("failed to extract '{}' into '{}'", archive.display(), dest.display())]
    Extract {
        archive: PathBuf,
        dest: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to remove temporary archive '{}'", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type FetchResult<T> = Result<T, FetchError>;
