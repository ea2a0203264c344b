use std::fmt;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::config::{validate_config, QueueConfig};
use crate::errors::{lock_queue, AppResult, QueueState};
use crate::models::{FileRef, UploadContainer, UploadStatus};

use super::batching::partition;
use super::id_generator::{IdGenerator, UuidV4Generator};

/// Owns the ordered list of upload containers. Clones share the same queue.
///
/// Containers are only added through [`UploadQueueStore::fill_queue`] and only
/// updated through the `progress_tracker` functions. Everything else gets
/// snapshots, so the queue cannot be cleared or reordered from outside:
///
/// ```compile_fail
/// let store = upload_queue::UploadQueueStore::default();
/// store.state().lock().unwrap().clear();
/// ```
#[derive(Clone)]
pub struct UploadQueueStore {
    containers_to_process: QueueState,
    batch_size: usize,
    id_generator: Arc<dyn IdGenerator>,
}

impl fmt::Debug for UploadQueueStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadQueueStore")
            .field("batch_size", &self.batch_size)
            .field(
                "containers",
                &self
                    .len()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|_| "<unavailable>".to_string()),
            )
            .finish()
    }
}

impl Default for UploadQueueStore {
    fn default() -> Self {
        Self {
            containers_to_process: Arc::new(Mutex::new(Vec::new())),
            batch_size: QueueConfig::default().batch_size,
            id_generator: Arc::new(UuidV4Generator),
        }
    }
}

impl UploadQueueStore {
    pub fn new(config: &QueueConfig) -> AppResult<Self> {
        Self::with_id_generator(config, Arc::new(UuidV4Generator))
    }

    pub fn with_id_generator(
        config: &QueueConfig,
        id_generator: Arc<dyn IdGenerator>,
    ) -> AppResult<Self> {
        validate_config(config)?;
        Ok(Self {
            containers_to_process: Arc::new(Mutex::new(Vec::new())),
            batch_size: config.batch_size,
            id_generator,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Shared handle for the progress tracker
    pub(crate) fn state(&self) -> &QueueState {
        &self.containers_to_process
    }

    /// Build a container from `files` and append it to the queue.
    /// An empty selection still produces a container, with no batches.
    pub fn fill_queue<I>(&self, files: I) -> AppResult<Uuid>
    where
        I: IntoIterator<Item = FileRef>,
    {
        let files: Vec<FileRef> = files.into_iter().collect();
        let n_files = files.len();
        let batches = partition(files, self.batch_size);
        let container = UploadContainer::new(self.id_generator.generate(), batches);
        let id = container.id;

        if n_files == 0 {
            log::warn!("Queued empty upload container {}", id);
        }

        let mut containers = lock_queue(&self.containers_to_process, "fill queue")?;
        log::info!(
            "Queued upload container {} with {} files in {} batches (position {})",
            id,
            container.n_images,
            container.batches.len(),
            containers.len() + 1
        );
        containers.push(container);

        Ok(id)
    }

    /// Snapshot of every container, in insertion order
    pub fn containers(&self) -> AppResult<Vec<UploadContainer>> {
        Ok(lock_queue(&self.containers_to_process, "read containers")?.clone())
    }

    pub fn get(&self, id: Uuid) -> AppResult<Option<UploadContainer>> {
        let containers = lock_queue(&self.containers_to_process, "get container")?;
        Ok(containers.iter().find(|c| c.id == id).cloned())
    }

    /// Oldest container nobody has started on yet
    pub fn next_waiting(&self) -> AppResult<Option<UploadContainer>> {
        let containers = lock_queue(&self.containers_to_process, "next waiting")?;
        Ok(containers
            .iter()
            .find(|c| c.status == UploadStatus::Waiting)
            .cloned())
    }

    pub fn len(&self) -> AppResult<usize> {
        Ok(lock_queue(&self.containers_to_process, "len")?.len())
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Pretty JSON snapshot of the queue for a UI
    pub fn to_json(&self) -> AppResult<String> {
        let containers = self.containers()?;
        Ok(serde_json::to_string_pretty(&containers)?)
    }
}
