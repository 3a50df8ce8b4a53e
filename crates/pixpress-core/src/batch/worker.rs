//! Ordered fan-out of independent jobs.
//!
//! With the `parallel` feature, jobs run on a rayon pool capped at the
//! configured concurrency. Results always come back in input order, whatever
//! order the workers finish in.

/// Run `f` over every job and collect results in input order.
#[cfg_attr(not(feature = "parallel"), allow(unused_variables))]
pub(crate) fn run_ordered<T, R, F>(jobs: Vec<T>, concurrency: usize, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        let workers = concurrency.min(jobs.len());
        if workers > 1 {
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => return pool.install(|| jobs.into_par_iter().map(&f).collect()),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to build worker pool, running sequentially")
                }
            }
        }
    }

    jobs.into_iter().map(f).collect()
}
