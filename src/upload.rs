//! File upload and CSV ingestion flow
//!
//! One parameterized flow drives both upload shapes: PDFs go to
//! `/upload_pdf` and produce no access URL; rubric CSVs go to
//! `/upload_rubric`, and the returned access URL is immediately fetched
//! and parsed into a fresh criteria list. Byte-level progress is reported
//! through a callback as the multipart body streams out.

use crate::api::{ApiClient, UploadedFile};
use crate::error::{DocqaError, Result};
use crate::rubric::parse_criteria;

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

/// Which upload sub-flow to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Document upload; not re-fetchable client-side afterwards
    Pdf,
    /// Rubric CSV upload; re-fetched and parsed into criteria on success
    Rubric,
}

impl UploadKind {
    /// Infer the upload kind from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("pdf") => Ok(Self::Pdf),
            Some("csv") => Ok(Self::Rubric),
            other => Err(DocqaError::Upload(format!(
                "Unsupported file type: {:?} (expected .pdf or .csv)",
                other.unwrap_or("none")
            ))
            .into()),
        }
    }

    fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Rubric => "text/csv",
        }
    }
}

/// Snapshot of transfer progress, reported once per body chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
    pub percent: u8,
}

/// Progress callback invoked from the body stream
pub type ProgressFn = dyn Fn(UploadProgress) + Send + Sync;

/// Result of a completed upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Session record; `file_url` is empty for PDFs
    pub file: UploadedFile,
    /// Refreshed criteria list, present only for rubric uploads
    pub criteria: Option<Vec<String>>,
}

/// Percentage of a transfer, as reported to progress callbacks
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    (sent * 100 / total) as u8
}

/// Wrap a byte stream so each chunk updates the running progress snapshot
fn progress_stream<S>(
    inner: S,
    total: u64,
    on_progress: Option<Arc<ProgressFn>>,
) -> impl Stream<Item = std::io::Result<Bytes>>
where
    S: Stream<Item = std::io::Result<Bytes>>,
{
    let sent = AtomicU64::new(0);
    inner.inspect_ok(move |chunk| {
        let sent = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
        if let Some(callback) = &on_progress {
            callback(UploadProgress {
                sent,
                total,
                percent: percent(sent, total),
            });
        }
    })
}

/// Parameterized upload flow
pub struct UploadFlow<'a> {
    client: &'a ApiClient,
}

impl<'a> UploadFlow<'a> {
    /// Create a flow bound to an API client
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Upload a file, streaming its bytes and reporting progress
    ///
    /// For rubric uploads the returned outcome carries the access URL and
    /// the freshly parsed criteria list; for PDFs the URL is empty and no
    /// criteria are produced.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, the upload is rejected,
    /// or (for rubrics) the stored CSV cannot be fetched or parsed.
    pub async fn send(
        &self,
        path: &Path,
        kind: UploadKind,
        token: Option<&str>,
        on_progress: Option<Arc<ProgressFn>>,
    ) -> Result<UploadOutcome> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DocqaError::Upload(format!("Invalid file path: {}", path.display())))?
            .to_string();

        let file = tokio::fs::File::open(path).await.map_err(|e| {
            DocqaError::Upload(format!("Cannot open {}: {}", path.display(), e))
        })?;
        let total = file
            .metadata()
            .await
            .map_err(|e| DocqaError::Upload(format!("Cannot stat {}: {}", path.display(), e)))?
            .len();

        tracing::info!("Uploading {} ({} bytes) as {:?}", file_name, total, kind);

        let stream = progress_stream(ReaderStream::new(file), total, on_progress);
        let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
            .file_name(file_name.clone())
            .mime_str(kind.mime())
            .map_err(|e| DocqaError::Upload(format!("Invalid mime type: {}", e)))?;
        let form = Form::new().part("file", part);

        match kind {
            UploadKind::Pdf => {
                self.client.upload_pdf(form, token).await?;
                Ok(UploadOutcome {
                    file: UploadedFile {
                        file_name,
                        file_url: String::new(),
                    },
                    criteria: None,
                })
            }
            UploadKind::Rubric => {
                let access_url = self.client.upload_rubric(form, token).await?;
                let csv_text = self.client.fetch_text(&access_url).await?;
                let criteria = parse_criteria(&csv_text)?;
                tracing::info!(
                    "Rubric {} stored, {} criteria ingested",
                    file_name,
                    criteria.len()
                );
                Ok(UploadOutcome {
                    file: UploadedFile {
                        file_name,
                        file_url: access_url,
                    },
                    criteria: Some(criteria),
                })
            }
        }
    }
}

/// Which stored rubric to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RubricSource<'a> {
    /// A file previously uploaded, by name
    Stored(&'a str),
    /// The backend's default rubric
    Default,
}

/// Load a stored rubric file into a replacement criteria list
///
/// Re-resolves the access URL, fetches the CSV body, and parses it. The
/// whole list is returned so the caller can swap it atomically — no
/// intermediate state mixes old and new criteria.
pub async fn select_rubric_file(
    client: &ApiClient,
    source: RubricSource<'_>,
    token: Option<&str>,
) -> Result<Vec<String>> {
    let access_url = match source {
        RubricSource::Stored(name) => client.csv_access_url(name, token).await?,
        RubricSource::Default => client.default_csv_access_url(token).await?,
    };

    let csv_text = client.fetch_text(&access_url).await?;
    parse_criteria(&csv_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::sync::Mutex;

    #[test]
    fn test_percent() {
        assert_eq!(percent(250, 1000), 25);
        assert_eq!(percent(0, 1000), 0);
        assert_eq!(percent(1000, 1000), 100);
        assert_eq!(percent(1, 3), 33);
    }

    #[test]
    fn test_percent_zero_total() {
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn test_upload_kind_from_path() {
        assert_eq!(
            UploadKind::from_path(Path::new("contract.pdf")).unwrap(),
            UploadKind::Pdf
        );
        assert_eq!(
            UploadKind::from_path(Path::new("rubric.CSV")).unwrap(),
            UploadKind::Rubric
        );
        assert!(UploadKind::from_path(Path::new("notes.txt")).is_err());
        assert!(UploadKind::from_path(Path::new("noext")).is_err());
    }

    #[tokio::test]
    async fn test_progress_stream_reports_running_percent() {
        let chunks: Vec<std::io::Result<Bytes>> = vec![
            Ok(Bytes::from(vec![0u8; 250])),
            Ok(Bytes::from(vec![0u8; 500])),
            Ok(Bytes::from(vec![0u8; 250])),
        ];
        let reports: Arc<Mutex<Vec<UploadProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let callback: Arc<ProgressFn> = Arc::new(move |p| sink.lock().unwrap().push(p));

        let wrapped = progress_stream(stream::iter(chunks), 1000, Some(callback));
        let collected: Vec<_> = wrapped.try_collect().await.unwrap();
        assert_eq!(collected.len(), 3);

        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].percent, 25);
        assert_eq!(reports[1], UploadProgress { sent: 750, total: 1000, percent: 75 });
        assert_eq!(reports[2].percent, 100);
    }

    #[tokio::test]
    async fn test_progress_stream_passes_chunks_through() {
        let chunks: Vec<std::io::Result<Bytes>> = vec![Ok(Bytes::from_static(b"a,b\nc,d"))];
        let wrapped = progress_stream(stream::iter(chunks), 7, None);
        let collected: Vec<_> = wrapped.try_collect().await.unwrap();
        assert_eq!(collected[0].as_ref(), b"a,b\nc,d");
    }
}
