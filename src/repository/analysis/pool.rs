//! Worker pool
//!
//! Fixed set of worker threads consuming a bounded FIFO queue, with a
//! sentinel-based shutdown protocol: `shutdown` enqueues a single sentinel
//! and every worker that reaches it leaves it in place for its peers, so
//! all pending work drains before any thread exits.
//!
//! The first handler failure is parked in a shared slot and returned from
//! `shutdown`; the failing worker exits early while the remaining workers
//! keep draining the queue.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use crate::repository::error::StatsError;

enum Entry<T> {
    Work(T),
    Shutdown,
}

struct State<T> {
    queue: VecDeque<Entry<T>>,
    failure: Option<StatsError>,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    work_ready: Condvar,
    space_free: Condvar,
}

fn lock<T>(shared: &Shared<T>) -> MutexGuard<'_, State<T>> {
    // Handlers report failures as values, so a poisoned mutex can only come
    // from a panic outside the protocol; the state is still usable.
    shared.state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct WorkerPool<T> {
    shared: Arc<Shared<T>>,
    capacity: usize,
    threads: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Start one worker thread per handler. `capacity` bounds the work queue;
    /// `submit` blocks while the queue is full.
    pub fn spawn<H>(capacity: usize, handlers: Vec<H>) -> Self
    where
        H: FnMut(T) -> Result<(), StatsError> + Send + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                failure: None,
            }),
            work_ready: Condvar::new(),
            space_free: Condvar::new(),
        });
        let threads = handlers
            .into_iter()
            .map(|handler| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || run_worker(&shared, handler))
            })
            .collect();
        Self {
            shared,
            capacity: capacity.max(1),
            threads,
        }
    }

    /// Enqueue one work item and wake a waiting worker. Blocks while the
    /// queue is at capacity. Once a failure has been recorded the item is
    /// dropped instead; the failure surfaces from `shutdown`.
    pub fn submit(&self, item: T) {
        let mut state = lock(&self.shared);
        while state.queue.len() >= self.capacity && state.failure.is_none() {
            state = self
                .shared
                .space_free
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.failure.is_some() {
            return;
        }
        state.queue.push_back(Entry::Work(item));
        drop(state);
        self.shared.work_ready.notify_one();
    }

    /// Enqueue the shutdown sentinel, join every worker, and report the
    /// first failure recorded by any of them.
    pub fn shutdown(mut self) -> Result<(), StatsError> {
        {
            let mut state = lock(&self.shared);
            state.queue.push_back(Entry::Shutdown);
        }
        self.shared.work_ready.notify_all();
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
        let mut state = lock(&self.shared);
        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn run_worker<T, H>(shared: &Shared<T>, mut handler: H)
where
    H: FnMut(T) -> Result<(), StatsError>,
{
    while let Some(item) = next_item(shared) {
        if let Err(err) = handler(item) {
            let mut state = lock(shared);
            if state.failure.is_none() {
                state.failure = Some(err);
            }
            drop(state);
            // A producer blocked on a full queue must observe the failure.
            shared.space_free.notify_all();
            return;
        }
    }
}

/// Block until the queue is non-empty, then pop the front work item.
/// Returns `None` on the shutdown sentinel, which stays in the queue so
/// every other worker observes it too.
fn next_item<T>(shared: &Shared<T>) -> Option<T> {
    let mut state = lock(shared);
    loop {
        match state.queue.front() {
            Some(Entry::Shutdown) => return None,
            Some(Entry::Work(_)) => break,
            None => {
                state = shared
                    .work_ready
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }
    }
    let item = match state.queue.pop_front() {
        Some(Entry::Work(item)) => item,
        _ => return None,
    };
    drop(state);
    shared.space_free.notify_one();
    Some(item)
}
