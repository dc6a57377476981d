//! Per-destination consumer draining records into its module

use super::bulk_queue::BulkQueue;
use super::callbacks::{Filter, Flusher};
use super::error::{LogError, Result};
use super::module::SinkModule;
use super::record::{Envelope, SharedEnvelope};
use super::worker_pool::WorkerPool;
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};

struct SinkState {
    module: Box<dyn SinkModule>,
    // Retained across drains to amortize allocation; non-empty only after a
    // failed drain, whose suffix it carries to the retry task.
    tray: Vec<SharedEnvelope>,
}

/// A named destination owning one module and one staging queue.
///
/// Producers (via the dispatcher) bulk-push envelopes into the queue; a
/// worker task drains the queue into the module. The mutex around the module
/// and tray is the sink's operate-mutex: at most one drain runs at a time,
/// and it only ever contends with itself.
pub struct Sink {
    name: String,
    queue: BulkQueue<SharedEnvelope>,
    state: Mutex<SinkState>,
    filter: RwLock<Option<Filter>>,
    flusher: RwLock<Option<Flusher>>,
    pool: Weak<WorkerPool>,
    self_ref: Weak<Sink>,
}

impl Sink {
    pub fn new(
        name: impl Into<String>,
        module: Box<dyn SinkModule>,
        pool: Weak<WorkerPool>,
    ) -> Arc<Self> {
        Self::with_capacity(name, module, 0, pool)
    }

    pub fn with_capacity(
        name: impl Into<String>,
        module: Box<dyn SinkModule>,
        capacity: usize,
        pool: Weak<WorkerPool>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            name: name.into(),
            queue: BulkQueue::with_capacity(capacity),
            state: Mutex::new(SinkState {
                module,
                tray: Vec::with_capacity(capacity),
            }),
            filter: RwLock::new(None),
            flusher: RwLock::new(None),
            pool,
            self_ref: me.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accept a batch of envelopes from a logger fan-out.
    ///
    /// The slice is split at every filter-rejected element; each surviving
    /// sub-slice is bulk-enqueued, and a drain task is scheduled whenever an
    /// enqueue finds the queue empty. The slice is not retained.
    ///
    /// # Errors
    ///
    /// Fails with a resource-gone error when the worker pool has been
    /// dropped.
    pub fn log(&self, envelopes: &[SharedEnvelope]) -> Result<()> {
        if envelopes.is_empty() {
            return Ok(());
        }

        let mut head = 0;
        for (index, envelope) in envelopes.iter().enumerate() {
            if !self.should_log(envelope) {
                self.enqueue_run(&envelopes[head..index])?;
                head = index + 1;
            }
        }
        self.enqueue_run(&envelopes[head..])
    }

    pub fn set_filter(&self, filter: Option<Filter>) {
        *self.filter.write() = filter;
    }

    pub fn set_flusher(&self, flusher: Option<Flusher>) {
        *self.flusher.write() = flusher;
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn is_queue_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn reserve(&self, additional: usize) {
        self.queue.reserve(additional);
        self.state.lock().tray.reserve(additional);
    }

    pub fn shrink_to_fit(&self) {
        self.queue.shrink_to_fit();
        self.state.lock().tray.shrink_to_fit();
    }

    /// Drain the staging queue into the module. Runs on a worker thread.
    pub(crate) fn drain(&self) -> Result<()> {
        let mut state = self.state.lock();

        // A prior failed drain leaves its suffix in the tray; deliver that
        // before swapping in new work so per-logger order holds.
        self.drain_tray(&mut state)?;

        if !self.queue.try_swap(&mut state.tray) {
            return Ok(());
        }

        self.drain_tray(&mut state)
    }

    fn drain_tray(&self, state: &mut SinkState) -> Result<()> {
        if state.tray.is_empty() {
            return Ok(());
        }

        let SinkState { module, tray } = state;

        let mut failure = None;
        for (index, envelope) in tray.iter().enumerate() {
            let mut result = module.write(&envelope.logger_name, &envelope.record);
            if result.is_ok() && self.should_flush(envelope) {
                result = module.flush();
            }

            if let Err(error) = result {
                failure = Some((index, error));
                break;
            }
        }

        match failure {
            None => {
                tray.clear();
                Ok(())
            }
            Some((index, error)) => {
                // The failing record is consumed rather than retried; the
                // tail stays in the tray for a fresh drain task.
                tray.drain(..=index);
                self.schedule_drain()?;
                Err(error)
            }
        }
    }

    fn enqueue_run(&self, run: &[SharedEnvelope]) -> Result<()> {
        if run.is_empty() {
            return Ok(());
        }

        if self.queue.push_bulk(run.iter().cloned()) {
            self.schedule_drain()?;
        }
        Ok(())
    }

    fn schedule_drain(&self) -> Result<()> {
        let pool = self
            .pool
            .upgrade()
            .ok_or_else(|| LogError::resource_gone("worker pool"))?;
        let me = self
            .self_ref
            .upgrade()
            .ok_or_else(|| LogError::resource_gone("sink"))?;

        pool.submit(Box::new(move || me.drain()));
        Ok(())
    }

    fn should_log(&self, envelope: &Envelope) -> bool {
        self.filter
            .read()
            .as_ref()
            .map_or(true, |filter| filter(&envelope.logger_name, &envelope.record))
    }

    fn should_flush(&self, envelope: &Envelope) -> bool {
        self.flusher
            .read()
            .as_ref()
            .map_or(false, |flusher| flusher(&envelope.logger_name, &envelope.record))
    }
}

impl Drop for Sink {
    fn drop(&mut self) {
        // Best effort; a failing flush has no error path left at this point.
        let _ = self.state.get_mut().module.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::LogLevel;
    use crate::core::record::Record;

    struct CaptureModule {
        lines: Arc<Mutex<Vec<String>>>,
        flushes: Arc<Mutex<usize>>,
    }

    impl SinkModule for CaptureModule {
        fn write(&mut self, logger_name: &str, record: &Record) -> Result<()> {
            self.lines
                .lock()
                .push(format!("{logger_name}:{}", record.message));
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            *self.flushes.lock() += 1;
            Ok(())
        }
    }

    fn envelope(message: &str) -> SharedEnvelope {
        Arc::new(Envelope::new(
            Arc::from("test"),
            Record::new(LogLevel::Info, message),
        ))
    }

    fn capture_sink(pool: &Arc<WorkerPool>) -> (Arc<Sink>, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let module = CaptureModule {
            lines: Arc::clone(&lines),
            flushes: Arc::new(Mutex::new(0)),
        };
        let sink = Sink::new("capture", Box::new(module), Arc::downgrade(pool));
        (sink, lines)
    }

    #[test]
    fn test_log_drains_through_pool() {
        let pool = Arc::new(WorkerPool::new(1).unwrap());
        let (sink, lines) = capture_sink(&pool);

        sink.log(&[envelope("a"), envelope("b")]).unwrap();
        pool.wait_until_idle();

        assert_eq!(lines.lock().as_slice(), ["test:a", "test:b"]);
        assert!(sink.is_queue_empty());
    }

    #[test]
    fn test_filter_splits_batches() {
        let pool = Arc::new(WorkerPool::new(1).unwrap());
        let (sink, lines) = capture_sink(&pool);
        sink.set_filter(Some(Box::new(|_: &str, record: &Record| {
            !record.message.contains("skip")
        })));

        sink.log(&[envelope("a"), envelope("skip-1"), envelope("b")])
            .unwrap();
        pool.wait_until_idle();

        assert_eq!(lines.lock().as_slice(), ["test:a", "test:b"]);
    }

    #[test]
    fn test_log_fails_when_pool_is_gone() {
        let pool = Arc::new(WorkerPool::new(1).unwrap());
        let (sink, _lines) = capture_sink(&pool);
        drop(pool);

        let result = sink.log(&[envelope("orphaned")]);
        assert!(matches!(result, Err(LogError::ResourceGone { .. })));
    }
}
