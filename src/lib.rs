//! Client-side upload queue.
//!
//! Selected files are split into fixed-size batches and tracked in upload
//! containers until an external executor sends them.

pub mod config;
pub mod errors;
pub mod models;
pub mod uploader;

pub use config::QueueConfig;
pub use errors::{AppError, AppResult};
pub use models::{Batch, FileRef, UploadContainer, UploadStatus};
pub use uploader::UploadQueueStore;
