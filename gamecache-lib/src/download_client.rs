use anyhow::Result;
use std::path::Path;

pub trait DownloadClient {
    /// Fetch a whole response body into memory.
    fn get(&self, url: &str, referer: Option<&str>)
    -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Stream `url` to `output_path`, creating parent directories as needed.
    /// `file://` URLs are copied from the local filesystem.
    fn download_file(
        &self,
        url: &str,
        referer: Option<&str>,
        output_path: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}
