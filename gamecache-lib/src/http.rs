use crate::download_client::DownloadClient;
use crate::logging::progress_bar_style;
use anyhow::{Context, Result, bail};
use reqwest::header::REFERER;
use reqwest::{Client, RequestBuilder};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns the local path of a `file://` URL.
pub fn local_path_from_url(url: &str) -> Option<PathBuf> {
    url.strip_prefix("file://").map(PathBuf::from)
}

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gamecache/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    fn request(&self, url: &str, referer: Option<&str>) -> RequestBuilder {
        let request = self.client.get(url);
        match referer {
            Some(referer) => request.header(REFERER, referer),
            None => request,
        }
    }

    async fn copy_local(source: &Path, output_path: &Path) -> Result<()> {
        tokio::fs::copy(source, output_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    source.display(),
                    output_path.display()
                )
            })?;
        Ok(())
    }
}

impl DownloadClient for HttpClient {
    async fn get(&self, url: &str, referer: Option<&str>) -> Result<Vec<u8>> {
        if let Some(source) = local_path_from_url(url) {
            return tokio::fs::read(&source)
                .await
                .with_context(|| format!("Failed to read {}", source.display()));
        }

        let response = self.request(url, referer).send().await?;
        if !response.status().is_success() {
            bail!("Unavailable url ({}): {}", url, response.status());
        }
        Ok(response.bytes().await?.to_vec())
    }

    #[instrument(skip_all)]
    async fn download_file(
        &self,
        url: &str,
        referer: Option<&str>,
        output_path: &Path,
    ) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        if let Some(source) = local_path_from_url(url) {
            return Self::copy_local(&source, output_path).await;
        }

        let file_name = output_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| url.to_string());
        let current_span = tracing::Span::current();
        current_span.pb_set_style(&progress_bar_style()?);
        current_span.pb_set_message(&format!("Downloading {}...", file_name));
        current_span.pb_set_finish_message(&format!("Downloading {}... Complete!", file_name));

        let response = self.request(url, referer).send().await?;

        if !response.status().is_success() {
            bail!("Download failed: {}", response.status());
        }
        if let Some(length) = response.content_length() {
            current_span.pb_set_length(length);
        }

        let mut file = tokio::fs::File::create(output_path).await?;
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        use futures_util::StreamExt;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            current_span.pb_set_position(downloaded);
        }

        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_path_from_url() {
        assert_eq!(
            local_path_from_url("file:///games/setup.exe"),
            Some(PathBuf::from("/games/setup.exe"))
        );
        assert_eq!(local_path_from_url("https://example.com/setup.exe"), None);
    }

    #[tokio::test]
    async fn test_file_urls_are_copied_locally() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let source = tmp_dir.path().join("source.zip");
        std::fs::write(&source, b"archive")?;
        let output = tmp_dir.path().join("out").join("copy.zip");
        let url = format!("file://{}", source.display());

        let client = HttpClient::new()?;
        client.download_file(&url, None, &output).await?;
        assert_eq!(std::fs::read(&output)?, b"archive");
        assert_eq!(client.get(&url, None).await?, b"archive");
        Ok(())
    }
}
