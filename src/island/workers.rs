//! Per-worker strategy clones and random streams.
//!
//! Every worker owns one clone of the evolve strategy and one [`WorkerRng`].
//! Islands are split into contiguous chunks, one chunk per worker, so no
//! island, strategy clone or generator is ever touched by two threads at
//! once and the hot path needs no locks.

use super::types::EvolveStrategy;
use crate::error::EngineResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Independent random streams owned by one worker.
#[derive(Debug, Clone)]
pub struct WorkerRng {
    probability: StdRng,
    index: StdRng,
    operator: StdRng,
}

impl WorkerRng {
    /// Derives the three streams from a master generator.
    pub fn from_master<R: Rng>(master: &mut R) -> Self {
        Self {
            probability: StdRng::seed_from_u64(master.random()),
            index: StdRng::seed_from_u64(master.random()),
            operator: StdRng::seed_from_u64(master.random()),
        }
    }

    /// Uniform draw in `(0, 1]`.
    ///
    /// Compared with `p <= rate`, a rate of `0.0` never fires and a rate of
    /// `1.0` always does.
    #[inline]
    pub fn draw_probability(&mut self) -> f64 {
        1.0 - self.probability.random::<f64>()
    }

    /// Uniform index in `0..n`. `n` must be positive.
    #[inline]
    pub fn draw_index(&mut self, n: usize) -> usize {
        self.index.random_range(0..n)
    }

    /// Stream handed to the strategy operators.
    #[inline]
    pub fn operator(&mut self) -> &mut StdRng {
        &mut self.operator
    }
}

/// One worker: a strategy clone and its random streams.
#[derive(Debug, Clone)]
pub struct Worker<St> {
    /// Position of the worker in the pool.
    pub id: usize,
    /// Private strategy clone.
    pub strategy: St,
    /// Private random streams.
    pub rng: WorkerRng,
}

/// Fixed-size pool of workers, optionally backed by a dedicated rayon pool.
pub struct WorkerPool<St> {
    workers: Vec<Worker<St>>,
    threads: Option<rayon::ThreadPool>,
}

impl<St: EvolveStrategy> WorkerPool<St> {
    /// Clones `prototype` into `count` workers seeded from `seed`.
    ///
    /// A rayon pool of `count` threads is built when `parallel` is set and
    /// there is more than one worker.
    pub fn new(prototype: &St, count: usize, seed: u64, parallel: bool) -> EngineResult<Self> {
        let count = count.max(1);
        let mut master = StdRng::seed_from_u64(seed);
        let workers = (0..count)
            .map(|id| Worker {
                id,
                strategy: prototype.clone(),
                rng: WorkerRng::from_master(&mut master),
            })
            .collect();

        let threads = if parallel && count > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(count)
                    .thread_name(|i| format!("u-archipelago-{i}"))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self { workers, threads })
    }

    /// Number of workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the pool has no workers.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Whether chunks run on the dedicated thread pool.
    pub fn is_parallel(&self) -> bool {
        self.threads.is_some()
    }

    /// The first worker, used for calls made outside the parallel phases.
    pub fn primary(&mut self) -> &mut Worker<St> {
        &mut self.workers[0]
    }

    /// Splits `items` into at most one contiguous chunk per worker and runs
    /// `op` on every (worker, chunk) pair.
    ///
    /// Returns when all chunks are done. The first error is returned and the
    /// chunks still pending are abandoned.
    pub fn partition<T, E, F>(&mut self, items: &mut [T], op: F) -> Result<(), E>
    where
        T: Send,
        E: Send,
        F: Fn(&mut Worker<St>, &mut [T]) -> Result<(), E> + Sync,
    {
        if items.is_empty() {
            return Ok(());
        }
        let chunk = items.len().div_ceil(self.workers.len());
        match &self.threads {
            Some(pool) => {
                let workers = &mut self.workers;
                pool.install(|| {
                    items
                        .par_chunks_mut(chunk)
                        .zip(workers.par_iter_mut())
                        .try_for_each(|(chunk, worker)| op(worker, chunk))
                })
            }
            None => items
                .chunks_mut(chunk)
                .zip(self.workers.iter_mut())
                .try_for_each(|(chunk, worker)| op(worker, chunk)),
        }
    }
}
