//! Streaming fetch-to-file

use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncWriteExt;

use crate::download::Download;
use crate::error::DownloadError;
use crate::Result;

#[derive(Clone, Default)]
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch `url` into `destination`, overwriting any existing file.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<Download> {
        let parsed = url::Url::parse(url).map_err(|e| DownloadError::InvalidUrl(e.to_string()))?;

        let mut download = Download::new(url.to_string(), destination.to_path_buf());

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let response = self.client.get(parsed).send().await?;
        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status()));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        download.start(mime_type, response.content_length());

        let written = write_body(response, destination, &mut download).await;
        let hash = match written {
            Ok(hash) => hash,
            Err(e) => {
                // A truncated body must not look like a finished file
                if let Err(remove) = tokio::fs::remove_file(destination).await {
                    tracing::warn!(path = %destination.display(), error = %remove, "Failed to remove partial download");
                }
                tracing::warn!(url = %download.url, error = %e, "Download failed");
                return Err(e);
            }
        };

        download.complete(hash);

        tracing::info!(
            url = %download.url,
            path = %destination.display(),
            bytes = download.downloaded_bytes,
            "Download complete"
        );

        Ok(download)
    }
}

/// Stream the response into a fresh file, returning the hex SHA-256 of what was written.
async fn write_body(
    response: reqwest::Response,
    destination: &Path,
    download: &mut Download,
) -> Result<String> {
    let mut file = tokio::fs::File::create(destination).await?;
    let mut hasher = Sha256::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        hasher.update(&chunk);
        download.downloaded_bytes = download.downloaded_bytes.saturating_add(chunk.len() as u64);
    }

    file.flush().await?;

    let digest = hasher.finalize();
    let mut hash = String::with_capacity(digest.len() * 2);
    for b in digest {
        hash.push_str(&format!("{:02x}", b));
    }
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::DownloadState;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    async fn serve_once(status: &'static str, body: &'static str) -> String {
        serve_raw(format!(
            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        ))
        .await
    }

    async fn serve_raw(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/files/hello.txt", addr)
    }

    fn downloader() -> Downloader {
        Downloader::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn test_fetch_writes_file() {
        let url = serve_once("200 OK", "hello").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("hello.txt");

        let download = downloader().fetch(&url, &dest).await.unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "hello");
        assert_eq!(download.state, DownloadState::Completed);
        assert_eq!(download.downloaded_bytes, 5);
        assert_eq!(download.total_bytes, Some(5));
        assert_eq!(download.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(
            download.hash.as_deref(),
            Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let url = serve_once("404 Not Found", "").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.txt");

        let result = downloader().fetch(&url, &dest).await;

        assert!(matches!(result, Err(DownloadError::Status(s)) if s.as_u16() == 404));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let result = downloader().fetch("not a url", &dir.path().join("x")).await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_truncated_body_leaves_no_file() {
        // Promises 100 bytes, sends 5, then hangs up
        let url = serve_raw(
            "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: 100\r\nConnection: close\r\n\r\nhello"
                .to_string(),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("partial.bin");

        let result = downloader().fetch(&url, &dest).await;

        assert!(matches!(result, Err(DownloadError::Network(_))));
        assert!(!dest.exists());
    }
}
