use crate::models::{Batch, FileRef};

/// Number of batches `n` files split into with batches of `size`
pub fn expected_batch_count(n: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    n.div_ceil(size)
}

/// Split files into consecutive batches of at most `size`, keeping order.
/// Batch k holds positions [k*size, min((k+1)*size, len)).
pub fn partition(files: Vec<FileRef>, size: usize) -> Vec<Batch> {
    debug_assert!(size > 0, "batch size must be non-zero");
    if size == 0 || files.is_empty() {
        return Vec::new();
    }

    let batches: Vec<Batch> = files
        .chunks(size)
        .map(|chunk| Batch::new(chunk.to_vec()))
        .collect();

    log::debug!(
        "Partitioned {} files into {} batches of max {}",
        files.len(),
        batches.len(),
        size
    );

    batches
}
