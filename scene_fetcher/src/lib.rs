//! Makes benchmark scenes available on disk.
//!
//! A scene is a zip archive fetched from a URL and unpacked into `<root>/scenes/<name>`. Once
//! unpacked, the directory itself acts as the cache and later runs skip the download.

mod checksum;
mod error;
mod extract;
mod fetch;

use std::path::{Path, PathBuf};

pub use checksum::Sha256Hash;
pub use error::{FetchError, FetchResult};
pub use fetch::{Downloader, HttpDownloader, DOWNLOAD_TIMEOUT};

/// Directory, relative to the fetcher root, that scenes are unpacked into.
pub const SCENES_DIR: &str = "scenes";

/// File name of the temporary download, relative to the fetcher root.
pub const TEMP_ARCHIVE_NAME: &str = "archive.zip";

/// A named scene archive and where to get it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneArchive {
    pub name: String,
    pub url: String,
    /// Checked against the downloaded archive when set.
    pub sha256: Option<Sha256Hash>,
}

impl SceneArchive {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            sha256: None,
        }
    }

    pub fn with_sha256(mut self, sha256: Sha256Hash) -> Self {
        self.sha256 = Some(sha256);
        self
    }
}

/// What [`SceneFetcher::ensure_archive`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// `scenes/<name>` already existed.
    Cached,
    /// Only a bare `<name>` path existed in the root directory. Older runs used that path as the
    /// existence marker even though extraction always targeted `scenes/<name>`.
    LegacyCached,
    /// The archive was downloaded and unpacked.
    Fetched,
}

pub struct SceneFetcher<D = HttpDownloader> {
    /// Working directory holding `scenes/` and the temporary archive
    root: PathBuf,
    downloader: D,
}

impl SceneFetcher<HttpDownloader> {
    /// Create a new [`SceneFetcher`] that downloads over HTTP(S).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_downloader(root, HttpDownloader::default())
    }
}

impl<D: Downloader> SceneFetcher<D> {
    pub fn with_downloader(root: impl Into<PathBuf>, downloader: D) -> Self {
        Self {
            root: root.into(),
            downloader,
        }
    }

    /// Directory the named scene is unpacked into.
    pub fn scene_dir(&self, name: &str) -> PathBuf {
        self.root.join(SCENES_DIR).join(name)
    }

    pub fn downloader(&self) -> &D {
        &self.downloader
    }

    /// Make sure the scene is unpacked, downloading it if neither the scene directory nor the
    /// legacy marker path exists.
    pub fn ensure_archive(&self, archive: &SceneArchive) -> FetchResult<FetchOutcome> {
        let scene_dir = self.scene_dir(&archive.name);
        if scene_dir.exists() {
            log::info!("Archive {} exists already", archive.name);
            return Ok(FetchOutcome::Cached);
        }

        let legacy_marker = self.root.join(&archive.name);
        if legacy_marker.exists() {
            log::warn!(
                "Archive {} treated as present because '{}' exists, but scenes are read from '{}'",
                archive.name,
                legacy_marker.display(),
                scene_dir.display()
            );
            return Ok(FetchOutcome::LegacyCached);
        }

        log::info!("Getting archive {} from {}", archive.name, archive.url);
        let archive_path = self.root.join(TEMP_ARCHIVE_NAME);
        self.download_to(archive, &archive_path)?;

        if let Some(expected) = archive.sha256 {
            let actual = Sha256Hash::of_file(&archive_path).map_err(|source| {
                FetchError::Download {
                    url: archive.url.clone(),
                    path: archive_path.clone(),
                    source,
                }
            })?;
            if actual != expected {
                std::fs::remove_file(&archive_path).ok();
                return Err(FetchError::ChecksumMismatch {
                    url: archive.url.clone(),
                    expected,
                    actual,
                });
            }
        }

        let entries = extract::extract_all(&archive_path, &scene_dir).map_err(|source| {
            FetchError::Extract {
                archive: archive_path.clone(),
                dest: scene_dir.clone(),
                source,
            }
        })?;
        log::info!("Extracted {entries} entries to {}", scene_dir.display());

        std::fs::remove_file(&archive_path).map_err(|source| FetchError::Cleanup {
            path: archive_path.clone(),
            source,
        })?;

        Ok(FetchOutcome::Fetched)
    }

    fn download_to(&self, archive: &SceneArchive, archive_path: &Path) -> FetchResult<()> {
        let to_error = |source| FetchError::Download {
            url: archive.url.clone(),
            path: archive_path.to_path_buf(),
            source,
        };

        let mut writer = std::fs::File::create(archive_path).map_err(to_error)?;
        match self.downloader.download(&archive.url, &mut writer) {
            Ok(bytes) => {
                log::debug!("Downloaded {bytes} bytes from {}", archive.url);
                Ok(())
            }
            Err(source) => {
                // partial download
                drop(writer);
                std::fs::remove_file(archive_path).ok();
                Err(to_error(source))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;

    struct FailingDownloader {
        calls: Cell<usize>,
    }

    impl Downloader for FailingDownloader {
        fn download(&self, _url: &str, writer: &mut dyn Write) -> std::io::Result<u64> {
            self.calls.set(self.calls.get() + 1);
            writer.write_all(b"PK partial")?;
            Err(std::io::Error::other("connection reset"))
        }
    }

    #[test]
    fn should_use_scenes_subdirectory() {
        let fetcher = SceneFetcher::new("/tmp/bench");
        assert_eq!(
            fetcher.scene_dir("BMW"),
            PathBuf::from("/tmp/bench/scenes/BMW")
        );
    }

    #[test]
    fn should_remove_partial_download() {
        let tempdir = tempfile::tempdir().expect("failed to create temp dir");
        let fetcher = SceneFetcher::with_downloader(
            tempdir.path(),
            FailingDownloader {
                calls: Cell::new(0),
            },
        );

        let result =
            fetcher.ensure_archive(&SceneArchive::new("BMW", "https://example.com/bmw.zip"));

        assert!(matches!(result, Err(FetchError::Download { .. })));
        assert_eq!(fetcher.downloader().calls.get(), 1);
        assert!(!tempdir.path().join(TEMP_ARCHIVE_NAME).exists());
        assert!(!fetcher.scene_dir("BMW").exists());
    }

    #[test]
    fn should_skip_when_legacy_marker_exists() {
        let tempdir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::create_dir(tempdir.path().join("BMW")).expect("failed to create marker");
        let fetcher = SceneFetcher::with_downloader(
            tempdir.path(),
            FailingDownloader {
                calls: Cell::new(0),
            },
        );

        let outcome = fetcher
            .ensure_archive(&SceneArchive::new("BMW", "https://example.com/bmw.zip"))
            .expect("legacy marker should short-circuit");

        assert_eq!(outcome, FetchOutcome::LegacyCached);
        assert_eq!(fetcher.downloader().calls.get(), 0);
    }
}
