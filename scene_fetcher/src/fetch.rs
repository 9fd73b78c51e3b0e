use std::io::Write;
use std::time::Duration;

/// Upper bound on a single archive download, scenes can be several hundred megabytes.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Source of archive bytes.
///
/// [`crate::SceneFetcher`] only talks to the network through this trait so that a scene can be
/// served from memory in tests.
pub trait Downloader {
    /// Stream the resource at `url` into `writer`, returning the number of bytes written.
    fn download(&self, url: &str, writer: &mut dyn Write) -> std::io::Result<u64>;
}

/// Plain HTTP(S) GET using a blocking [`ureq::Agent`].
pub struct HttpDownloader {
    agent: ureq::Agent,
}

impl HttpDownloader {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::config::Config::builder()
            .timeout_global(Some(timeout))
            .build()
            .new_agent();

        Self { agent }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new(DOWNLOAD_TIMEOUT)
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, writer: &mut dyn Write) -> std::io::Result<u64> {
        let response = self.agent.get(url).call().map_err(std::io::Error::other)?;

        let mut body = response.into_body();
        std::io::copy(&mut body.as_reader(), writer)
    }
}
