use crate::error::AnalysisError;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Bounded pool for the collaborator calls of one run
pub fn build_pool(max_concurrency: usize) -> Result<ThreadPool, AnalysisError> {
    Ok(ThreadPoolBuilder::new()
        .num_threads(max_concurrency.max(1))
        .thread_name(|i| format!("report-worker-{i}"))
        .build()?)
}

/// Apply `task` to every item on the pool. Result `i` always belongs to
/// item `i`, whatever order the tasks finish in.
pub fn fan_out<T, R, F>(pool: &ThreadPool, items: &[T], task: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    pool.install(|| items.par_iter().map(task).collect())
}
