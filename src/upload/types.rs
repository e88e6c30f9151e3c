use bytes::Bytes;
use derivative::Derivative;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of one selection entry; names may repeat, ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u64);

impl FileId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Where the bytes of a selected file live.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum Payload {
    Path(PathBuf),
    Bytes(#[derivative(Debug = "ignore")] Bytes),
}

impl Payload {
    pub async fn read(&self) -> std::io::Result<Bytes> {
        match self {
            Self::Path(path) => tokio::fs::read(path).await.map(Bytes::from),
            Self::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Pending,
    Uploading,
    Done,
    Error,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub id: FileId,
    pub name: String,
    pub size: u64,
    pub payload: Payload,
    pub status: UploadStatus,
    pub percent: u8,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64, payload: Payload) -> Self {
        Self {
            id: FileId::next(),
            name: name.into(),
            size,
            payload,
            status: UploadStatus::Pending,
            percent: 0,
        }
    }
}

/// A gallery entry: created once per accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub url: String,
}

/// Body of a successful upload response.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub url: String,
}

/// Called with (bytes sent, bytes total) as the request body goes out.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Per-batch counts, returned once every upload has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
}
