// Uploader module - upload queue state and the bookkeeping around it
//
// Batches are built here; sending them is left to an external executor

pub mod batching;
pub mod id_generator;
pub mod progress_tracker;
pub mod upload_queue;

pub use id_generator::{IdGenerator, SequentialIdGenerator, UuidV4Generator};
pub use upload_queue::UploadQueueStore;
