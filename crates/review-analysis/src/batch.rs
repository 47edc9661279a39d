//! Batched, order-preserving parallel map over records.

use rayon::prelude::*;

/// Apply `f` to every item, `batch_size` items at a time.
///
/// Items inside a batch run on the rayon pool; results come back in input
/// order, so the output is identical for every batch size.
pub fn map_batched<T, U, F>(items: &[T], batch_size: usize, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    let mut out = Vec::with_capacity(items.len());
    for chunk in items.chunks(batch_size.max(1)) {
        let batch: Vec<U> = chunk.par_iter().map(&f).collect();
        out.extend(batch);
    }
    out
}
