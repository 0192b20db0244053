//! Bounded parallel executor with main-thread fallback when capacity is
//! tight.
//!
//! Same bounded-channel semaphore plus `rayon::ThreadPool` backing as a
//! classic fixed-size worker pool, but parameterised over a result type `T`
//! and widened with a shared, mutex-guarded results list so a coordinator
//! can poll for newly finished work instead of just blocking on completion.

use crossbeam_channel::{bounded, Receiver, Sender};
use rayon::ThreadPool as RayonPool;
use std::sync::{Arc, Condvar, Mutex};

struct PoolState {
    pending: usize,
    finished_since_reap: usize,
}

/// A pool with capacity `worker_count`. `start` spawns jobs that publish
/// their result into a shared list; `join_finished` reaps however many have
/// completed since the last call.
pub struct WorkerPool<T> {
    pool: Arc<RayonPool>,
    slot_tx: Sender<()>,
    slot_rx: Receiver<()>,
    use_main_process: bool,
    results: Arc<Mutex<Vec<T>>>,
    state: Arc<(Mutex<PoolState>, Condvar)>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// `worker_count` must be at least 1. `use_main_process`, when set,
    /// makes `start` execute the job inline on the caller's thread whenever
    /// exactly one slot remains — reserving the spawn for batches where
    /// parallelism still pays off.
    pub fn new(worker_count: usize, use_main_process: bool) -> Option<Self> {
        if worker_count < 1 {
            return None;
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .build()
            .ok()?;

        let (slot_tx, slot_rx) = bounded(worker_count);
        for _ in 0..worker_count {
            slot_tx.send(()).ok()?;
        }

        let state = Arc::new((
            Mutex::new(PoolState {
                pending: 0,
                finished_since_reap: 0,
            }),
            Condvar::new(),
        ));

        Some(WorkerPool {
            pool: Arc::new(pool),
            slot_tx,
            slot_rx,
            use_main_process,
            results: Arc::new(Mutex::new(Vec::new())),
            state,
        })
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.slot_rx.len()
    }

    /// Run `job`, publishing its result into the shared list. Blocks if no
    /// slot is free; runs inline on the caller when `use_main_process` is
    /// set and exactly one slot remains.
    pub fn start<F>(&self, job: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if self.use_main_process && self.available() == 1 {
            let value = job();
            self.results.lock().unwrap().push(value);
            let (lock, _cvar) = &*self.state;
            lock.lock().unwrap().finished_since_reap += 1;
            return;
        }

        self.slot_rx.recv().expect("worker pool slot channel closed");
        {
            let (lock, _cvar) = &*self.state;
            lock.lock().unwrap().pending += 1;
        }

        let results = Arc::clone(&self.results);
        let state = Arc::clone(&self.state);
        let slot_tx = self.slot_tx.clone();
        self.pool.spawn(move || {
            let value = job();
            results.lock().unwrap().push(value);

            let (lock, cvar) = &*state;
            let mut s = lock.lock().unwrap();
            s.pending -= 1;
            s.finished_since_reap += 1;
            if s.pending == 0 {
                cvar.notify_all();
            }
            let _ = slot_tx.send(());
        });
    }

    /// Reap however many jobs have completed since the last call, returning
    /// the count.
    pub fn join_finished(&self) -> usize {
        let (lock, _cvar) = &*self.state;
        let mut s = lock.lock().unwrap();
        let n = s.finished_since_reap;
        s.finished_since_reap = 0;
        n
    }

    /// Block until every submitted job has completed.
    pub fn join_all(&self) {
        let (lock, cvar) = &*self.state;
        let mut s = lock.lock().unwrap();
        while s.pending > 0 {
            s = cvar.wait(s).unwrap();
        }
    }

    /// Discard whatever has been published so far. Already-spawned rayon
    /// closures cannot be preempted, so this is cooperative: it only
    /// guarantees that partially-accumulated state is never observed, since
    /// `start` only ever publishes a result after `job` has fully returned.
    pub fn kill_all(&self) -> usize {
        let mut results = self.results.lock().unwrap();
        let discarded = results.len();
        results.clear();
        discarded
    }

    /// Snapshot of every result published so far.
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.results.lock().unwrap().clone()
    }

    /// Take every result published so far, leaving the shared list empty.
    /// Unlike [`kill_all`](Self::kill_all) this is meant to be called
    /// routinely between batches, not as a cancellation primitive.
    pub fn drain(&self) -> Vec<T> {
        std::mem::take(&mut *self.results.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn jobs_complete_and_are_reaped() {
        let pool = WorkerPool::new(4, false).unwrap();
        for i in 0..10 {
            pool.start(move || i * 2);
        }
        pool.join_all();
        let mut results = pool.snapshot();
        results.sort_unstable();
        assert_eq!(results, (0..10).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn single_worker_runs_jobs_one_at_a_time() {
        let pool = WorkerPool::new(1, false).unwrap();
        let concurrent = Arc::new(AtomicUsize::new(0));
        let max_concurrent = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let concurrent = Arc::clone(&concurrent);
            let max_concurrent = Arc::clone(&max_concurrent);
            pool.start(move || {
                let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                max_concurrent.fetch_max(now, Ordering::SeqCst);
                concurrent.fetch_sub(1, Ordering::SeqCst);
            });
        }
        pool.join_all();
        assert_eq!(max_concurrent.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn use_main_process_runs_inline_at_last_slot() {
        let pool: WorkerPool<std::thread::ThreadId> = WorkerPool::new(2, true).unwrap();
        // Occupy one slot with a job that blocks until told to proceed.
        let (tx, rx) = bounded::<()>(0);
        pool.start(move || {
            rx.recv().ok();
            std::thread::current().id()
        });
        // Exactly one slot remains; this job should run inline on this
        // thread rather than being queued onto the pool.
        let main_thread = std::thread::current().id();
        pool.start(|| std::thread::current().id());
        tx.send(()).ok();
        pool.join_all();
        let results = pool.snapshot();
        assert_eq!(results.len(), 2);
        assert!(results.contains(&main_thread));
    }
}
