use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

use crate::models::UploadContainer;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upload queue unavailable during {operation}")]
    QueueUnavailable { operation: String },

    #[error("Upload container not found: {id}")]
    ContainerNotFound { id: String },

    #[error("Batch {index} not found in container {id}")]
    BatchNotFound { id: String, index: usize },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

/// Convert to string for UI bindings
impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.to_string()
    }
}

/// Custom result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::FileNotFound {
            path: path.to_string(),
        }
    }

    pub fn queue_unavailable(operation: &str) -> Self {
        log::error!("Failed to acquire upload queue lock for {}", operation);
        Self::QueueUnavailable {
            operation: operation.to_string(),
        }
    }

    pub fn container_not_found(id: &str) -> Self {
        Self::ContainerNotFound { id: id.to_string() }
    }

    pub fn batch_not_found(id: &str, index: usize) -> Self {
        Self::BatchNotFound {
            id: id.to_string(),
            index,
        }
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Errors caused by the caller's input rather than the queue itself
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidInput(_)
                | AppError::Validation { .. }
                | AppError::FileNotFound { .. }
                | AppError::ContainerNotFound { .. }
                | AppError::BatchNotFound { .. }
                | AppError::InvalidTransition { .. }
        )
    }
}

/// Shared queue state type, only ever handed out inside the crate
pub(crate) type QueueState = Arc<Mutex<Vec<UploadContainer>>>;

/// Lock the queue, turning a poisoned lock into an error for the caller
pub(crate) fn lock_queue<'a>(
    state: &'a QueueState,
    operation: &str,
) -> AppResult<MutexGuard<'a, Vec<UploadContainer>>> {
    state
        .lock()
        .map_err(|_| AppError::queue_unavailable(operation))
}

/// Run `f` against a single container, looked up by id
pub(crate) fn with_container_mut<F, R>(
    state: &QueueState,
    container_id: Uuid,
    operation: &str,
    f: F,
) -> AppResult<R>
where
    F: FnOnce(&mut UploadContainer) -> AppResult<R>,
{
    let mut containers = lock_queue(state, operation)?;
    match containers
        .iter_mut()
        .find(|c| c.id == container_id)
    {
        Some(container) => f(container),
        None => {
            log::warn!(
                "Container {} not found for {} operation",
                container_id,
                operation
            );
            Err(AppError::container_not_found(&container_id.to_string()))
        }
    }
}
