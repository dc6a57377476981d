//! Fixed-size worker pool executing one-shot tasks

use super::callbacks::ErrorHandler;
use super::error::{LogError, Result};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A one-shot unit of work submitted to the pool.
pub type Task = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

struct PoolState {
    queue: VecDeque<Task>,
    running: usize,
    shutdown: bool,
    error_handler: Option<ErrorHandler>,
}

struct Shared {
    state: Mutex<PoolState>,
    work: Condvar,
    idle: Condvar,
}

/// A fixed set of worker threads draining a FIFO task queue.
///
/// Tasks never unwind out of a worker: an `Err` return or a panic is routed
/// to the installed error handler and the thread keeps serving. Actors that
/// need serial execution (dispatcher, sinks) provide their own operate-mutex;
/// the pool itself makes no ordering promise beyond FIFO hand-off.
pub struct WorkerPool {
    shared: Arc<Shared>,
    threads: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` threads.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidWorkerCount`] for `workers == 0` and an IO
    /// error if the OS refuses to spawn a thread.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(LogError::InvalidWorkerCount);
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                // Workers count as running until they park for the first
                // time, so `wait_until_idle` cannot return before start-up.
                running: workers,
                shutdown: false,
                error_handler: None,
            }),
            work: Condvar::new(),
            idle: Condvar::new(),
        });

        let mut threads = Vec::with_capacity(workers);
        for index in 0..workers {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("fanlog-worker-{index}"))
                .spawn(move || worker_loop(&worker_shared));

            match spawned {
                Ok(handle) => threads.push(handle),
                Err(source) => {
                    shared.state.lock().shutdown = true;
                    shared.work.notify_all();
                    for handle in threads {
                        let _ = handle.join();
                    }
                    return Err(LogError::io_operation(
                        "spawning",
                        format!("worker thread {index}"),
                        source,
                    ));
                }
            }
        }

        Ok(Self { shared, threads })
    }

    /// Enqueue one task and wake a single parked worker.
    pub fn submit(&self, task: Task) {
        {
            let mut state = self.shared.state.lock();
            state.queue.push_back(task);
        }
        self.shared.work.notify_one();
    }

    /// Block until the task queue is empty and no worker is executing.
    pub fn wait_until_idle(&self) {
        let mut state = self.shared.state.lock();
        self.shared
            .idle
            .wait_while(&mut state, |s| s.running != 0 || !s.queue.is_empty());
    }

    pub fn set_error_handler(&self, handler: Option<ErrorHandler>) {
        self.shared.state.lock().error_handler = handler;
    }

    pub fn worker_count(&self) -> usize {
        self.threads.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shared.state.lock().shutdown = true;
        self.shared.work.notify_all();

        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let task = {
            let mut state = shared.state.lock();

            state.running -= 1;
            if state.running == 0 && state.queue.is_empty() {
                shared.idle.notify_all();
            }

            shared
                .work
                .wait_while(&mut state, |s| s.queue.is_empty() && !s.shutdown);

            state.running += 1;

            match state.queue.pop_front() {
                Some(task) => task,
                // Woken for shutdown with nothing left to run.
                None => break,
            }
        };

        let error = match catch_unwind(AssertUnwindSafe(task)) {
            Ok(Ok(())) => continue,
            Ok(Err(error)) => error,
            Err(panic) => LogError::TaskPanic(panic_message(&panic)),
        };
        eprintln!("DEBUG: task failed with error: {error}");

        // Clone the handler out of the lock; a handler is allowed to touch
        // the pool (e.g. submit follow-up work) without deadlocking.
        let handler = shared.state.lock().error_handler.clone();
        eprintln!("DEBUG: handler present: {}", handler.is_some());
        if let Some(handler) = handler {
            handler(&error);
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    eprintln!("DEBUG panic payload type_id: {:?}", panic.type_id());
    eprintln!("DEBUG &str type_id: {:?}", std::any::TypeId::of::<&str>());
    eprintln!("DEBUG String type_id: {:?}", std::any::TypeId::of::<String>());
    eprintln!("DEBUG &&str type_id: {:?}", std::any::TypeId::of::<&&str>());
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
