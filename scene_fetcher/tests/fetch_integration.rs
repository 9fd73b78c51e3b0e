use scene_fetcher::{
    Downloader, FetchError, FetchOutcome, SceneArchive, SceneFetcher, Sha256Hash,
    TEMP_ARCHIVE_NAME,
};
use std::cell::Cell;
use std::io::{Cursor, Write};
use std::str::FromStr as _;
use zip::write::SimpleFileOptions;

const SAMPLE_URL: &str = "https://download.blender.org/demo/test/BMW27_2.blend.zip";

/// Serves a fixed zip payload and counts how often it was asked to.
struct InMemoryDownloader {
    payload: Vec<u8>,
    calls: Cell<usize>,
}

impl InMemoryDownloader {
    fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            calls: Cell::new(0),
        }
    }
}

impl Downloader for InMemoryDownloader {
    fn download(&self, _url: &str, writer: &mut dyn Write) -> std::io::Result<u64> {
        self.calls.set(self.calls.get() + 1);
        writer.write_all(&self.payload)?;
        Ok(self.payload.len() as u64)
    }
}

fn scene_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .add_directory("bmw27/", SimpleFileOptions::default())
        .expect("failed to add directory");
    writer
        .start_file("bmw27/bmw27_gpu.blend", SimpleFileOptions::default())
        .expect("failed to start entry");
    writer
        .write_all(b"BLENDER-v279")
        .expect("failed to write entry");
    writer
        .finish()
        .expect("failed to finish zip")
        .into_inner()
}

#[test]
fn should_fetch_and_extract_missing_scene() {
    let tempdir = tempfile::tempdir().expect("failed to create temp dir");
    let fetcher =
        SceneFetcher::with_downloader(tempdir.path(), InMemoryDownloader::new(scene_zip()));

    let outcome = fetcher
        .ensure_archive(&SceneArchive::new("BMW", SAMPLE_URL))
        .expect("failed to fetch scene");

    assert_eq!(outcome, FetchOutcome::Fetched);
    assert_eq!(fetcher.downloader().calls.get(), 1);
    assert!(fetcher.scene_dir("BMW").is_dir());
    assert!(fetcher
        .scene_dir("BMW")
        .join("bmw27")
        .join("bmw27_gpu.blend")
        .is_file());
    assert!(
        !tempdir.path().join(TEMP_ARCHIVE_NAME).exists(),
        "temporary archive should be removed after extraction"
    );
}

#[test]
fn should_not_touch_network_or_disk_for_existing_scene() {
    let tempdir = tempfile::tempdir().expect("failed to create temp dir");
    let fetcher =
        SceneFetcher::with_downloader(tempdir.path(), InMemoryDownloader::new(scene_zip()));
    std::fs::create_dir_all(fetcher.scene_dir("BMW")).expect("failed to create scene dir");

    let outcome = fetcher
        .ensure_archive(&SceneArchive::new("BMW", SAMPLE_URL))
        .expect("cached scene should not fail");

    assert_eq!(outcome, FetchOutcome::Cached);
    assert_eq!(fetcher.downloader().calls.get(), 0);
    assert!(!tempdir.path().join(TEMP_ARCHIVE_NAME).exists());
    let entries = std::fs::read_dir(fetcher.scene_dir("BMW"))
        .expect("failed to list scene dir")
        .count();
    assert_eq!(entries, 0, "cached scene directory should be left untouched");
}

#[test]
fn should_skip_download_on_second_run() {
    let tempdir = tempfile::tempdir().expect("failed to create temp dir");
    let fetcher =
        SceneFetcher::with_downloader(tempdir.path(), InMemoryDownloader::new(scene_zip()));
    let archive = SceneArchive::new("BMW", SAMPLE_URL);

    assert_eq!(
        fetcher.ensure_archive(&archive).expect("first run failed"),
        FetchOutcome::Fetched
    );
    assert_eq!(
        fetcher.ensure_archive(&archive).expect("second run failed"),
        FetchOutcome::Cached
    );
    assert_eq!(fetcher.downloader().calls.get(), 1);
}

#[test]
fn should_verify_checksum_when_given() {
    let tempdir = tempfile::tempdir().expect("failed to create temp dir");
    let fetcher =
        SceneFetcher::with_downloader(tempdir.path(), InMemoryDownloader::new(scene_zip()));
    let archive = SceneArchive::new("BMW", SAMPLE_URL).with_sha256(
        Sha256Hash::from_str("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
            .expect("invalid sha256"),
    );

    let result = fetcher.ensure_archive(&archive);

    assert!(
        matches!(result, Err(FetchError::ChecksumMismatch { .. })),
        "expected checksum mismatch, got {result:?}"
    );
    assert!(!tempdir.path().join(TEMP_ARCHIVE_NAME).exists());
    assert!(!fetcher.scene_dir("BMW").exists());
}

#[test]
fn should_fail_on_malformed_archive() {
    let tempdir = tempfile::tempdir().expect("failed to create temp dir");
    let fetcher = SceneFetcher::with_downloader(
        tempdir.path(),
        InMemoryDownloader::new(b"<html>not found</html>".to_vec()),
    );

    let result = fetcher.ensure_archive(&SceneArchive::new("BMW", SAMPLE_URL));

    assert!(
        matches!(result, Err(FetchError::Extract { .. })),
        "expected extract error, got {result:?}"
    );
}

#[test]
fn should_fetch_again_after_failed_extraction() {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("bmw27/readme.txt", SimpleFileOptions::default())
        .expect("failed to start entry");
    writer.write_all(b"read me").expect("failed to write entry");
    writer
        .start_file("../escape.blend", SimpleFileOptions::default())
        .expect("failed to start entry");
    writer.write_all(b"BLENDER").expect("failed to write entry");
    let payload = writer
        .finish()
        .expect("failed to finish zip")
        .into_inner();

    let tempdir = tempfile::tempdir().expect("failed to create temp dir");
    let fetcher = SceneFetcher::with_downloader(tempdir.path(), InMemoryDownloader::new(payload));
    let archive = SceneArchive::new("BMW", SAMPLE_URL);

    let first = fetcher.ensure_archive(&archive);
    assert!(
        matches!(first, Err(FetchError::Extract { .. })),
        "expected extract error, got {first:?}"
    );
    assert!(!fetcher.scene_dir("BMW").exists());

    let second = fetcher.ensure_archive(&archive);
    assert!(
        matches!(second, Err(FetchError::Extract { .. })),
        "a half extracted scene must not count as cached, got {second:?}"
    );
    assert_eq!(fetcher.downloader().calls.get(), 2);
}
