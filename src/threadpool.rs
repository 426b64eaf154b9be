//! Bounded worker pool for the CLI's per-file jobs.
//!
//! Jobs run on a `rayon::ThreadPool`. Submission blocks once `queue_size`
//! jobs are waiting on top of those already running, which keeps memory
//! bounded when thousands of files are named on the command line; a
//! `crossbeam_channel::bounded` channel pre-filled with tokens acts as the
//! semaphore.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rayon::ThreadPool as RayonPool;

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct TPool {
    pool: RayonPool,
    // A token is taken before a job is queued and returned when it ends.
    slot_tx: Sender<()>,
    slot_rx: Receiver<()>,
    pending: Arc<(Mutex<usize>, Condvar)>,
}

impl TPool {
    /// Returns `None` if either argument is 0 or the threads cannot be spawned.
    pub fn new(nb_threads: usize, queue_size: usize) -> Option<Self> {
        if nb_threads < 1 || queue_size < 1 {
            return None;
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(nb_threads)
            .thread_name(|i| format!("bzs-worker-{i}"))
            .build()
            .ok()?;

        let capacity = queue_size + nb_threads;
        let (slot_tx, slot_rx) = bounded(capacity);
        for _ in 0..capacity {
            slot_tx.send(()).ok()?;
        }

        Some(TPool {
            pool,
            slot_tx,
            slot_rx,
            pending: Arc::new((Mutex::new(0), Condvar::new())),
        })
    }

    pub fn nb_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queues `job`, blocking while the queue is full.
    pub fn submit_job(&self, job: Job) {
        // Both ends live in `self`, so the channel cannot be disconnected.
        let _ = self.slot_rx.recv();
        {
            let (lock, _) = &*self.pending;
            *lock.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        }

        let pending = Arc::clone(&self.pending);
        let slot_tx = self.slot_tx.clone();
        self.pool.spawn(move || {
            job();
            let (lock, cvar) = &*pending;
            let mut n = lock.lock().unwrap_or_else(PoisonError::into_inner);
            *n -= 1;
            if *n == 0 {
                cvar.notify_all();
            }
            let _ = slot_tx.send(());
        });
    }

    /// Blocks until every submitted job has finished. The pool stays usable.
    pub fn jobs_completed(&self) {
        let (lock, cvar) = &*self.pending;
        let mut n = lock.lock().unwrap_or_else(PoisonError::into_inner);
        while *n > 0 {
            n = cvar.wait(n).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Runs `f` on every item and returns the results in input order.
    pub fn map_ordered<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let count = items.len();
        let f = Arc::new(f);
        let (tx, rx) = unbounded();
        for (index, item) in items.into_iter().enumerate() {
            let f = Arc::clone(&f);
            let tx = tx.clone();
            self.submit_job(Box::new(move || {
                let _ = tx.send((index, f(item)));
            }));
        }
        drop(tx);

        let mut slots: Vec<Option<R>> = (0..count).map(|_| None).collect();
        for (index, result) in rx {
            slots[index] = Some(result);
        }
        slots.into_iter().flatten().collect()
    }
}

impl Drop for TPool {
    fn drop(&mut self) {
        self.jobs_completed();
    }
}
