use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// A user-selected file. The queue only groups these, it never reads contents.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub size: u64,
    pub path: Option<PathBuf>,
}

impl FileRef {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            path: None,
        }
    }

    /// Build a reference from a path on disk, reading only its metadata
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let display = path.to_string_lossy();

        if display.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "File path cannot be empty".to_string(),
            ));
        }

        if !path.exists() {
            return Err(AppError::file_not_found(&display));
        }

        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(AppError::validation("file_path", "Path is not a file"));
        }

        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self {
            name,
            size: metadata.len(),
            path: Some(path.to_path_buf()),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UploadStatus {
    #[default]
    Waiting,
    InProgress,
    Done,
    Error,
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Done | UploadStatus::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Waiting => "waiting",
            UploadStatus::InProgress => "in-progress",
            UploadStatus::Done => "done",
            UploadStatus::Error => "error",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Batch {
    pub files: Vec<FileRef>,
    pub status: UploadStatus,
}

impl Batch {
    pub fn new(files: Vec<FileRef>) -> Self {
        Self {
            files,
            status: UploadStatus::Waiting,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total bytes across the batch, as reported by the host
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadContainer {
    pub id: Uuid,
    pub batches: Vec<Batch>,
    pub n_images: usize,
    pub progress: usize, // completed batches
    pub status: UploadStatus,
    pub created_at: DateTime<Utc>,
}

impl UploadContainer {
    pub fn new(id: Uuid, batches: Vec<Batch>) -> Self {
        let n_images = batches.iter().map(Batch::len).sum();
        Self {
            id,
            batches,
            n_images,
            progress: 0,
            status: UploadStatus::Waiting,
            created_at: Utc::now(),
        }
    }

    /// Completed share of batches, 0.0 - 100.0
    pub fn percent_complete(&self) -> f32 {
        if self.batches.is_empty() {
            return if self.status == UploadStatus::Done {
                100.0
            } else {
                0.0
            };
        }
        (self.progress as f32 / self.batches.len() as f32) * 100.0
    }

    /// All file references in their original order
    pub fn files(&self) -> impl Iterator<Item = &FileRef> {
        self.batches.iter().flat_map(|b| b.files.iter())
    }
}
