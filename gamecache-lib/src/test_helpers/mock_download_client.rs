use crate::download_client::DownloadClient;
use anyhow::{Context, anyhow};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// Serves canned bodies by URL and records every request in order.
/// Unknown URLs fail like an unreachable server.
#[derive(Default)]
pub struct MockDownloadClient {
    responses: HashMap<String, Vec<u8>>,
    requested: Mutex<Vec<String>>,
}

impl MockDownloadClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, body: &[u8]) -> Self {
        self.responses.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    fn respond(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        self.requested.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("Unable to connect to server ({})", url))
    }
}

impl DownloadClient for MockDownloadClient {
    async fn get(&self, url: &str, _referer: Option<&str>) -> anyhow::Result<Vec<u8>> {
        self.respond(url)
    }

    async fn download_file(
        &self,
        url: &str,
        _referer: Option<&str>,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        let body = self.respond(url)?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, body)
            .context(format!("Failed to write file: {:?}", output_path))?;
        Ok(())
    }
}
