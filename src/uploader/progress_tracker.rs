use uuid::Uuid;

use crate::errors::{with_container_mut, AppError, AppResult};
use crate::models::{Batch, UploadContainer, UploadStatus};

use super::upload_queue::UploadQueueStore;

fn batch_mut<'a>(
    container: &'a mut UploadContainer,
    batch_index: usize,
) -> AppResult<&'a mut Batch> {
    let id = container.id.to_string();
    container
        .batches
        .get_mut(batch_index)
        .ok_or_else(|| AppError::batch_not_found(&id, batch_index))
}

fn ensure_not_terminal(container: &UploadContainer, to: UploadStatus) -> AppResult<()> {
    if container.status.is_terminal() {
        log::warn!(
            "Refusing to move finished container {} from {} to {}",
            container.id,
            container.status,
            to
        );
        return Err(AppError::invalid_transition(container.status, to));
    }
    Ok(())
}

/// An executor picked up batch `batch_index` and is sending it
pub fn mark_batch_started(
    store: &UploadQueueStore,
    container_id: Uuid,
    batch_index: usize,
) -> AppResult<()> {
    with_container_mut(
        store.state(),
        container_id,
        "batch started",
        |container| {
            ensure_not_terminal(container, UploadStatus::InProgress)?;

            let batch = batch_mut(container, batch_index)?;
            if batch.status != UploadStatus::Waiting {
                return Err(AppError::invalid_transition(
                    batch.status,
                    UploadStatus::InProgress,
                ));
            }
            batch.status = UploadStatus::InProgress;
            container.status = UploadStatus::InProgress;

            log::debug!(
                "Progress: Started batch {} of {} in container {}",
                batch_index + 1,
                container.batches.len(),
                container_id
            );
            Ok(())
        },
    )
}

/// Batch `batch_index` was sent. The container finishes with its last batch.
pub fn mark_batch_completed(
    store: &UploadQueueStore,
    container_id: Uuid,
    batch_index: usize,
) -> AppResult<()> {
    with_container_mut(
        store.state(),
        container_id,
        "batch completed",
        |container| {
            ensure_not_terminal(container, UploadStatus::Done)?;

            let batch = batch_mut(container, batch_index)?;
            if batch.status.is_terminal() {
                return Err(AppError::invalid_transition(
                    batch.status,
                    UploadStatus::Done,
                ));
            }
            batch.status = UploadStatus::Done;
            container.progress += 1;

            if container.progress == container.batches.len() {
                container.status = UploadStatus::Done;
                log::info!(
                    "Container {} completed: {} files in {} batches",
                    container_id,
                    container.n_images,
                    container.batches.len()
                );
            } else {
                container.status = UploadStatus::InProgress;
                log::info!(
                    "Progress: Completed batch {} of container {} ({}/{})",
                    batch_index + 1,
                    container_id,
                    container.progress,
                    container.batches.len()
                );
            }
            Ok(())
        },
    )
}

/// Batch `batch_index` could not be sent. The whole container is marked failed.
pub fn mark_batch_failed(
    store: &UploadQueueStore,
    container_id: Uuid,
    batch_index: usize,
    reason: &str,
) -> AppResult<()> {
    with_container_mut(
        store.state(),
        container_id,
        "batch failed",
        |container| {
            ensure_not_terminal(container, UploadStatus::Error)?;

            let batch = batch_mut(container, batch_index)?;
            if batch.status.is_terminal() {
                return Err(AppError::invalid_transition(
                    batch.status,
                    UploadStatus::Error,
                ));
            }
            batch.status = UploadStatus::Error;
            container.status = UploadStatus::Error;

            log::warn!(
                "Progress: Batch {} of container {} failed - {} ({}/{} batches done)",
                batch_index + 1,
                container_id,
                reason,
                container.progress,
                container.batches.len()
            );
            Ok(())
        },
    )
}

/// Finish a container that has no batches to send
pub fn mark_container_completed(store: &UploadQueueStore, container_id: Uuid) -> AppResult<()> {
    with_container_mut(
        store.state(),
        container_id,
        "mark completed",
        |container| {
            ensure_not_terminal(container, UploadStatus::Done)?;

            if container.progress != container.batches.len() {
                return Err(AppError::invalid_transition(
                    container.status,
                    UploadStatus::Done,
                ));
            }
            container.status = UploadStatus::Done;

            log::info!("Container {} marked as completed", container_id);
            Ok(())
        },
    )
}
