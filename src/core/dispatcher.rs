//! Fan-out of queued envelopes to each logger's sinks

use super::bulk_queue::PairBulkQueue;
use super::error::{LogError, Result};
use super::logger::Logger;
use super::record::SharedEnvelope;
use super::worker_pool::WorkerPool;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

#[derive(Default)]
struct DispatchTrays {
    loggers: Vec<Arc<Logger>>,
    envelopes: Vec<SharedEnvelope>,
}

/// The single per-manager multiplexer between producers and sinks.
///
/// Producers append `(logger, envelope)` pairs; a worker task swaps the
/// queue into a reusable tray pair and walks it, delivering maximal runs of
/// consecutive same-logger envelopes with one fan-out call each. The tray
/// mutex is the dispatcher's operate-mutex: dispatch serializes with itself,
/// which is what preserves per-logger order even on a multi-worker pool.
pub struct Dispatcher {
    queue: PairBulkQueue<Arc<Logger>, SharedEnvelope>,
    trays: Mutex<DispatchTrays>,
    pool: Weak<WorkerPool>,
    self_ref: Weak<Dispatcher>,
}

impl Dispatcher {
    pub fn new(pool: Weak<WorkerPool>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            queue: PairBulkQueue::new(),
            trays: Mutex::new(DispatchTrays::default()),
            pool,
            self_ref: me.clone(),
        })
    }

    /// Append one envelope for `logger`; on the queue's empty-transition,
    /// schedule a dispatch task.
    ///
    /// # Errors
    ///
    /// Fails with a resource-gone error when the worker pool has been
    /// dropped.
    pub fn enqueue(&self, logger: Arc<Logger>, envelope: SharedEnvelope) -> Result<()> {
        if self.queue.push(logger, envelope) {
            self.schedule_dispatch()?;
        }
        Ok(())
    }

    pub fn is_queue_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn reserve(&self, additional: usize) {
        self.queue.reserve(additional);

        let mut trays = self.trays.lock();
        trays.loggers.reserve(additional);
        trays.envelopes.reserve(additional);
    }

    pub fn shrink_to_fit(&self) {
        self.queue.shrink_to_fit();

        let mut trays = self.trays.lock();
        trays.loggers.shrink_to_fit();
        trays.envelopes.shrink_to_fit();
    }

    /// Deliver everything staged so far. Runs on a worker thread.
    pub(crate) fn dispatch(&self) -> Result<()> {
        let mut trays = self.trays.lock();

        // A prior failed dispatch leaves its residue in the trays; deliver
        // that before swapping in new work so per-logger order holds.
        self.deliver_from_trays(&mut trays)?;

        let DispatchTrays { loggers, envelopes } = &mut *trays;
        if !self.queue.try_swap(loggers, envelopes) {
            return Ok(());
        }

        self.deliver_from_trays(&mut trays)
    }

    fn deliver_from_trays(&self, trays: &mut DispatchTrays) -> Result<()> {
        debug_assert_eq!(trays.loggers.len(), trays.envelopes.len());

        let total = trays.loggers.len();
        let mut start = 0;

        while start < total {
            // Runs are detected by logger identity; producers interleave, so
            // batches from one logger arrive as consecutive stretches.
            let mut end = start + 1;
            while end < total && Arc::ptr_eq(&trays.loggers[end], &trays.loggers[start]) {
                end += 1;
            }

            if let Err(error) =
                trays.loggers[start].deliver_to_sinks(&trays.envelopes[start..end])
            {
                // Keep the failing run onward; a fresh task retries it.
                trays.loggers.drain(..start);
                trays.envelopes.drain(..start);
                self.schedule_dispatch()?;
                return Err(error);
            }

            start = end;
        }

        trays.loggers.clear();
        trays.envelopes.clear();
        Ok(())
    }

    fn schedule_dispatch(&self) -> Result<()> {
        let pool = self
            .pool
            .upgrade()
            .ok_or_else(|| LogError::resource_gone("worker pool"))?;
        let me = self
            .self_ref
            .upgrade()
            .ok_or_else(|| LogError::resource_gone("dispatcher"))?;

        pool.submit(Box::new(move || me.dispatch()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::LogLevel;
    use crate::core::record::{Envelope, Record};

    fn envelope(name: &str, message: &str) -> SharedEnvelope {
        Arc::new(Envelope::new(
            Arc::from(name),
            Record::new(LogLevel::Info, message),
        ))
    }

    #[test]
    fn test_enqueue_fails_when_pool_is_gone() {
        let dispatcher = Dispatcher::new(Weak::new());
        let logger = Logger::new("a", Weak::new());

        let result = dispatcher.enqueue(logger, envelope("a", "m"));
        assert!(matches!(result, Err(LogError::ResourceGone { .. })));
        // The pair stays staged even though scheduling failed
        assert_eq!(dispatcher.queue_len(), 1);
    }

    #[test]
    fn test_enqueue_signals_only_the_empty_transition() {
        let pool = Arc::new(WorkerPool::new(1).unwrap());
        // Park the worker so the queue observably accumulates
        let gate = Arc::new(parking_lot::Mutex::new(()));
        let held = gate.lock();
        {
            let gate = Arc::clone(&gate);
            pool.submit(Box::new(move || {
                let _wait = gate.lock();
                Ok(())
            }));
        }

        let dispatcher = Dispatcher::new(Arc::downgrade(&pool));
        let logger = Logger::new("a", Weak::new());

        for i in 0..5 {
            dispatcher
                .enqueue(Arc::clone(&logger), envelope("a", &i.to_string()))
                .unwrap();
        }
        assert_eq!(dispatcher.queue_len(), 5);
        assert!(!dispatcher.is_queue_empty());

        drop(held);
        pool.wait_until_idle();
        // The single scheduled dispatch drained the whole burst
        assert!(dispatcher.is_queue_empty());
    }

    #[test]
    fn test_reserve_and_shrink() {
        let dispatcher = Dispatcher::new(Weak::new());

        dispatcher.reserve(64);
        assert!(dispatcher.queue_capacity() >= 64);

        dispatcher.shrink_to_fit();
        assert_eq!(dispatcher.queue_len(), 0);
    }
}
