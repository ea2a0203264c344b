use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use upload_queue::uploader::progress_tracker::{
    mark_batch_completed, mark_batch_failed, mark_batch_started, mark_container_completed,
};
use upload_queue::uploader::SequentialIdGenerator;
use upload_queue::{AppError, FileRef, QueueConfig, UploadQueueStore, UploadStatus};

/// Integration tests for the upload queue
/// These tests drive the store the way a UI and an upload executor would

fn selection(n: usize) -> Vec<FileRef> {
    (0..n)
        .map(|i| FileRef::new(format!("VRChat_2024-01-01_00-00-{:02}.png", i), 2048))
        .collect()
}

#[test]
fn test_selection_to_finished_upload() {
    let store = UploadQueueStore::new(&QueueConfig::default()).unwrap();
    let id = store.fill_queue(selection(12)).unwrap();

    // Executor consumes the oldest waiting container batch by batch
    let container = store.next_waiting().unwrap().expect("queued container");
    assert_eq!(container.id, id);

    for index in 0..container.batches.len() {
        mark_batch_started(&store, id, index).unwrap();
        mark_batch_completed(&store, id, index).unwrap();
    }

    let finished = store.get(id).unwrap().unwrap();
    assert_eq!(finished.status, UploadStatus::Done);
    assert_eq!(finished.progress, 3);
    assert!(finished
        .batches
        .iter()
        .all(|b| b.status == UploadStatus::Done));
    assert!(store.next_waiting().unwrap().is_none());
}

#[test]
fn test_sequential_calls_scenario() {
    let store = UploadQueueStore::with_id_generator(
        &QueueConfig::default(),
        Arc::new(SequentialIdGenerator::starting_at(100)),
    )
    .unwrap();

    store.fill_queue(selection(3)).unwrap();
    store.fill_queue(selection(7)).unwrap();

    let containers = store.containers().unwrap();
    let shapes: Vec<Vec<usize>> = containers
        .iter()
        .map(|c| c.batches.iter().map(|b| b.len()).collect())
        .collect();
    assert_eq!(shapes, vec![vec![3], vec![5, 2]]);
    assert_eq!(containers[0].n_images, 3);
    assert_eq!(containers[1].n_images, 7);
    assert!(containers
        .iter()
        .all(|c| c.progress == 0 && c.status == UploadStatus::Waiting));
}

#[test]
fn test_failed_container_does_not_block_queue() {
    let store = UploadQueueStore::default();
    let first = store.fill_queue(selection(4)).unwrap();
    let second = store.fill_queue(selection(4)).unwrap();
    let empty = store.fill_queue(Vec::new()).unwrap();

    mark_batch_started(&store, first, 0).unwrap();
    mark_batch_failed(&store, first, 0, "server returned 500").unwrap();
    assert_eq!(store.next_waiting().unwrap().map(|c| c.id), Some(second));

    mark_batch_completed(&store, second, 0).unwrap();
    assert_eq!(store.next_waiting().unwrap().map(|c| c.id), Some(empty));

    mark_container_completed(&store, empty).unwrap();
    assert!(store.next_waiting().unwrap().is_none());

    let statuses: Vec<UploadStatus> = store
        .containers()
        .unwrap()
        .iter()
        .map(|c| c.status)
        .collect();
    assert_eq!(
        statuses,
        vec![UploadStatus::Error, UploadStatus::Done, UploadStatus::Done]
    );
}

#[test]
fn test_files_from_disk() {
    let temp_dir = std::env::temp_dir().join(format!("upload_queue_it_{}", std::process::id()));
    std::fs::create_dir_all(&temp_dir).unwrap();

    let mut refs = Vec::new();
    for i in 0..6 {
        let path = temp_dir.join(format!("image_{}.png", i));
        let mut file = File::create(&path).unwrap();
        file.write_all(&vec![0u8; i + 1]).unwrap();
        refs.push(FileRef::from_path(&path).unwrap());
    }

    let store = UploadQueueStore::default();
    let id = store.fill_queue(refs).unwrap();
    let container = store.get(id).unwrap().unwrap();

    // Cleanup
    let _ = std::fs::remove_dir_all(&temp_dir);

    assert_eq!(container.n_images, 6);
    assert_eq!(container.batches[0].total_size(), 1 + 2 + 3 + 4 + 5);
    assert_eq!(container.batches[1].total_size(), 6);
    assert_eq!(container.batches[1].files[0].name, "image_5.png");
}

#[test]
fn test_snapshots_cannot_change_the_queue() {
    let store = UploadQueueStore::default();
    let first = store.fill_queue(selection(2)).unwrap();
    store.fill_queue(selection(3)).unwrap();

    let mut snapshot = store.containers().unwrap();
    snapshot.clear();
    let mut single = store.get(first).unwrap().unwrap();
    single.status = UploadStatus::Done;
    single.batches.clear();

    assert_eq!(store.len().unwrap(), 2);
    let stored = store.get(first).unwrap().unwrap();
    assert_eq!(stored.status, UploadStatus::Waiting);
    assert_eq!(stored.batches.len(), 1);
    assert_eq!(store.next_waiting().unwrap().map(|c| c.id), Some(first));
}

#[test]
fn test_missing_file_is_reported() {
    match FileRef::from_path("definitely_does_not_exist.png") {
        Err(AppError::FileNotFound { path }) => {
            assert_eq!(path, "definitely_does_not_exist.png");
        }
        other => panic!("Expected FileNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_fills() {
    let store = UploadQueueStore::default();

    let handles: Vec<_> = (1..=20)
        .map(|n| {
            let store = store.clone();
            tokio::task::spawn_blocking(move || store.fill_queue(selection(n)))
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap().unwrap());
    }

    let containers = store.containers().unwrap();
    assert_eq!(ids.len(), 20);
    assert_eq!(containers.len(), 20);

    let total: usize = containers.iter().map(|c| c.n_images).sum();
    assert_eq!(total, (1..=20).sum::<usize>());
    for container in &containers {
        let batched: usize = container.batches.iter().map(|b| b.len()).sum();
        assert_eq!(batched, container.n_images);
        assert_eq!(container.batches.len(), container.n_images.div_ceil(5));
    }
}
