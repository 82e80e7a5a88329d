//! Downloading remote files into the local cache
//!
//! A plain GET with the HTTP client's defaults: no custom headers, no
//! timeout override, default redirect following and no retry. Only a 200
//! response is accepted.

use crate::error::{MirrorError, MirrorResult};
use crate::ui::{TransferProgress, UiContext};
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;
use url::Url;

/// Retrieves a remote resource into a local file
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download `url` into `dest`, creating or truncating it.
    ///
    /// Returns the number of bytes written. A failed fetch may leave a
    /// partial file behind; removing it is up to the caller.
    async fn fetch(&self, url: &Url, dest: &Path) -> MirrorResult<u64>;
}

/// Fetcher backed by a blocking `ureq` agent
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    ui: UiContext,
}

impl HttpFetcher {
    pub fn new(ui: UiContext) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            ui,
        }
    }

    fn fetch_blocking(&self, url: &str, dest: &Path) -> MirrorResult<u64> {
        let file = open_dest(dest)?;

        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(code)) => {
                return Err(MirrorError::FetchStatus {
                    url: url.to_string(),
                    code,
                })
            }
            Err(e) => {
                return Err(MirrorError::FetchTransport {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        let code = response.status().as_u16();
        if code != 200 {
            return Err(MirrorError::FetchStatus {
                url: url.to_string(),
                code,
            });
        }

        let len = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        debug!("GET {} -> {} ({:?} bytes)", url, code, len);

        let label = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let progress = TransferProgress::new(&self.ui, &label, len);

        let mut reader = response.into_body().into_reader();
        let mut writer = BufWriter::new(progress.wrap_write(file));
        let copied = io::copy(&mut reader, &mut writer).and_then(|n| writer.flush().map(|_| n));
        progress.finish();

        copied.map_err(|source| MirrorError::FetchStream {
            url: url.to_string(),
            path: dest.to_path_buf(),
            source,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, dest: &Path) -> MirrorResult<u64> {
        let fetcher = self.clone();
        let url = url.to_string();
        let dest = dest.to_path_buf();

        tokio::task::spawn_blocking(move || fetcher.fetch_blocking(&url, &dest))
            .await
            .map_err(|e| MirrorError::Internal(format!("fetch task failed: {}", e)))?
    }
}

fn open_dest(dest: &Path) -> MirrorResult<File> {
    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o640);
    }

    options
        .open(dest)
        .map_err(|e| MirrorError::io(format!("creating {}", dest.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    /// Serve a single canned response on a random local port
    fn serve_once(status: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            // The client may hang up early on error statuses
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
            let _ = stream.flush();
        });

        format!("http://{}/files/report.pdf", addr)
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(UiContext::non_interactive())
    }

    #[tokio::test]
    async fn fetch_writes_body() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("report.pdf");
        let url = Url::parse(&serve_once("200 OK", b"%PDF-1.7 content")).unwrap();

        let written = fetcher().fetch(&url, &dest).await.unwrap();

        assert_eq!(written, 16);
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.7 content");
    }

    #[tokio::test]
    async fn fetch_truncates_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("report.pdf");
        std::fs::write(&dest, b"a much longer stale body").unwrap();
        let url = Url::parse(&serve_once("200 OK", b"new")).unwrap();

        fetcher().fetch(&url, &dest).await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[tokio::test]
    async fn fetch_rejects_not_found() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("report.pdf");
        let url = Url::parse(&serve_once("404 Not Found", b"missing")).unwrap();

        let err = fetcher().fetch(&url, &dest).await.unwrap_err();

        assert!(matches!(err, MirrorError::FetchStatus { code: 404, .. }));
        // Cleanup is the caller's job
        assert!(dest.exists());
    }

    #[tokio::test]
    async fn fetch_rejects_non_200_success() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("report.pdf");
        let url = Url::parse(&serve_once("203 Non-Authoritative Information", b"x")).unwrap();

        let err = fetcher().fetch(&url, &dest).await.unwrap_err();

        assert!(matches!(err, MirrorError::FetchStatus { code: 203, .. }));
    }

    #[tokio::test]
    async fn fetch_reports_transport_errors() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("report.pdf");
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = Url::parse(&format!("http://127.0.0.1:{}/report.pdf", port)).unwrap();

        let err = fetcher().fetch(&url, &dest).await.unwrap_err();

        assert!(matches!(err, MirrorError::FetchTransport { .. }));
        assert_eq!(err.stage(), "fetch");
    }

    #[tokio::test]
    async fn fetch_fails_when_workspace_missing() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("missing").join("report.pdf");
        let url = Url::parse("http://127.0.0.1:9/report.pdf").unwrap();

        let err = fetcher().fetch(&url, &dest).await.unwrap_err();

        assert_eq!(err.stage(), "filesystem");
    }
}
