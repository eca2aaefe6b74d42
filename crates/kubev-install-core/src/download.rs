//! Release asset download with bounded retries
//!
//! Each file is streamed to `<dest>.part` and renamed into place once the
//! body has been fully written. A failed attempt truncates the partial file
//! and starts over; transient HTTP statuses and transport errors are retried
//! according to the configured [`RetryPolicy`].

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{InstallError, Result};
use crate::retry::{
    HttpStatusError, HttpStatusPredicate, RetryExecutor, RetryPolicy, RetryPredicate,
    TracingObserver,
};

/// Failure of a single download attempt
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("server returned {0}")]
    Status(StatusCode),

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HttpStatusError for FetchError {
    fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(status.as_u16()),
            _ => None,
        }
    }
}

/// Retries transient network failures; local write errors are final
#[derive(Debug, Clone, Default)]
struct TransientFailure(HttpStatusPredicate);

impl RetryPredicate<FetchError> for TransientFailure {
    fn should_retry(&self, error: &FetchError) -> bool {
        match error {
            FetchError::Write { .. } => false,
            other => self.0.should_retry(other),
        }
    }
}

/// Size and attempt count of a completed download
#[derive(Debug)]
pub struct DownloadResult {
    pub file_size: u64,
    pub attempts: u32,
}

/// Downloads release assets over HTTP
pub struct Downloader {
    client: reqwest::Client,
    retry_policy: RetryPolicy,
    show_progress: bool,
}

impl Downloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            retry_policy: RetryPolicy::download(),
            show_progress: true,
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Progress bars are only drawn when stderr is a terminal
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Fetch `url` into `dest`, retrying per policy
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<DownloadResult> {
        let label = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| url.to_string());

        info!("Downloading {}", url);

        let executor = RetryExecutor::new(
            self.retry_policy.clone(),
            TransientFailure::default(),
            TracingObserver::new(format!("download {}", label)),
        );

        let outcome = executor
            .execute(|attempt| self.fetch_once(url, dest, &label, attempt))
            .await;

        match outcome {
            Ok((file_size, attempts)) => {
                debug!(url = url, bytes = file_size, "download complete");
                Ok(DownloadResult {
                    file_size,
                    attempts,
                })
            }
            Err(err) => {
                let _ = fs::remove_file(partial_path(dest)).await;
                Err(InstallError::Download {
                    url: url.to_string(),
                    attempts: err.attempts(),
                    reason: err.last_error().to_string(),
                })
            }
        }
    }

    async fn fetch_once(
        &self,
        url: &str,
        dest: &Path,
        label: &str,
        attempt: u32,
    ) -> std::result::Result<(u64, u32), FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let progress = self.progress_bar(response.content_length(), label, attempt);

        let part = partial_path(dest);
        let write_err = |source| FetchError::Write {
            path: part.clone(),
            source,
        };

        let mut file = fs::File::create(&part).await.map_err(write_err)?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk.map_err(FetchError::Body)?;
            file.write_all(&chunk).await.map_err(write_err)?;
            downloaded += chunk.len() as u64;

            if let Some(pb) = &progress {
                pb.set_position(downloaded);
            }
        }

        file.flush().await.map_err(write_err)?;
        drop(file);

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        fs::rename(&part, dest).await.map_err(|source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        })?;

        Ok((downloaded, attempt))
    }

    fn progress_bar(&self, total: Option<u64>, label: &str, attempt: u32) -> Option<ProgressBar> {
        if !self.show_progress || !io::stderr().is_terminal() {
            return None;
        }

        let pb = match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar().template(
                    "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                ) {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            None => ProgressBar::new_spinner(),
        };

        if attempt > 1 {
            pb.set_message(format!("Downloading {} (attempt {})", label, attempt));
        } else {
            pb.set_message(format!("Downloading {}", label));
        }
        Some(pb)
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
