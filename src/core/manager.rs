//! Lifecycle and registry for loggers and sinks

use super::callbacks::ErrorHandler;
use super::dispatcher::Dispatcher;
use super::error::{LogError, Result};
use super::logger::Logger;
use super::module::SinkModule;
use super::sink::Sink;
use super::worker_pool::WorkerPool;
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Owner of the whole engine: worker pool, dispatcher, and the two name
/// registries.
///
/// Logger and sink names live in independent namespaces, so a logger and a
/// sink may share a name. Dropping the manager quiesces the pool, marks
/// every logger destroyed, and releases sinks (each flushes its module on
/// drop) before tearing down the dispatcher and pool.
pub struct Manager {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    sinks: Mutex<HashMap<String, Arc<Sink>>>,
    error_handler: Mutex<Option<ErrorHandler>>,
    // Field order fixes teardown: the dispatcher drops before the pool.
    dispatcher: Arc<Dispatcher>,
    pool: Arc<WorkerPool>,
}

impl Manager {
    /// Create an engine backed by `workers` threads.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidWorkerCount`] for `workers == 0`.
    pub fn new(workers: usize) -> Result<Self> {
        let pool = Arc::new(WorkerPool::new(workers)?);
        let dispatcher = Dispatcher::new(Arc::downgrade(&pool));

        Ok(Self {
            loggers: Mutex::new(HashMap::new()),
            sinks: Mutex::new(HashMap::new()),
            error_handler: Mutex::new(None),
            dispatcher,
            pool,
        })
    }

    /// Register a new logger bound to this manager's dispatcher.
    ///
    /// The logger inherits the manager's error handler. Its lifetime is
    /// managed here; callers keep a shared handle.
    pub fn new_logger(&self, name: &str) -> Result<Arc<Logger>> {
        let handler = self.error_handler.lock().clone();
        let mut loggers = self.loggers.lock();

        match loggers.entry(name.to_string()) {
            Entry::Occupied(_) => Err(LogError::duplicate_name("logger", name)),
            Entry::Vacant(slot) => {
                let logger = Logger::new(name, Arc::downgrade(&self.dispatcher));
                if handler.is_some() {
                    logger.set_error_handler(handler);
                }
                slot.insert(Arc::clone(&logger));
                Ok(logger)
            }
        }
    }

    pub fn find_logger(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.lock().get(name).cloned()
    }

    /// Remove a logger from the registry.
    ///
    /// The logger is marked destroyed immediately, so any further `log`
    /// through an outstanding handle fails; records already staged in the
    /// dispatcher still reach their sinks.
    pub fn delete_logger(&self, name: &str) -> Result<()> {
        let mut loggers = self.loggers.lock();

        match loggers.remove(name) {
            Some(logger) => {
                logger.mark_destroyed();
                Ok(())
            }
            None => Err(LogError::unknown_name("logger", name)),
        }
    }

    /// Register a new sink owning `module`, bound to this manager's pool.
    pub fn new_sink(&self, name: &str, module: Box<dyn SinkModule>) -> Result<Arc<Sink>> {
        let mut sinks = self.sinks.lock();

        match sinks.entry(name.to_string()) {
            Entry::Occupied(_) => Err(LogError::duplicate_name("sink", name)),
            Entry::Vacant(slot) => {
                let sink = Sink::new(name, module, Arc::downgrade(&self.pool));
                slot.insert(Arc::clone(&sink));
                Ok(sink)
            }
        }
    }

    pub fn find_sink(&self, name: &str) -> Option<Arc<Sink>> {
        self.sinks.lock().get(name).cloned()
    }

    /// Remove a sink from the registry.
    ///
    /// Outstanding shared handles (loggers still fanning out to it) keep the
    /// sink alive until they drop; its module flushes at that point.
    pub fn delete_sink(&self, name: &str) -> Result<()> {
        let mut sinks = self.sinks.lock();

        match sinks.remove(name) {
            Some(_) => Ok(()),
            None => Err(LogError::unknown_name("sink", name)),
        }
    }

    /// Install an error handler on the pool and every registered logger.
    /// Loggers created afterwards inherit it.
    pub fn set_error_handler(&self, handler: Option<ErrorHandler>) {
        *self.error_handler.lock() = handler.clone();

        self.pool.set_error_handler(handler.clone());

        let loggers = self.loggers.lock();
        for logger in loggers.values() {
            logger.set_error_handler(handler.clone());
        }
    }

    /// Block until every staged record has been delivered and all workers
    /// are parked.
    pub fn wait_until_idle(&self) {
        self.pool.wait_until_idle();
    }

    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        // Quiesce before touching the registries so staged records drain
        // while their loggers and sinks are still whole.
        self.pool.wait_until_idle();

        {
            let mut loggers = self.loggers.lock();
            for logger in loggers.values() {
                logger.mark_destroyed();
            }
            loggers.clear();
        }

        self.sinks.lock().clear();
    }
}
