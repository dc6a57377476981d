//! Producer facade packaging records into the dispatcher

use super::callbacks::{ErrorHandler, Filter};
use super::dispatcher::Dispatcher;
use super::error::{LogError, Result};
use super::level::LogLevel;
use super::record::{Envelope, Record, SharedEnvelope};
use super::sink::Sink;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// A named producer handle.
///
/// `log` packages a record into an envelope carrying the logger's shared
/// name handle and appends it to the dispatcher's staging queue; everything
/// slow happens later on the worker pool. The sink list is the fan-out set
/// the dispatcher delivers each run to.
pub struct Logger {
    // Shared into every envelope so consumers read the producer's name
    // without touching the producer.
    name: Arc<str>,
    dispatcher: Weak<Dispatcher>,
    sinks: Mutex<Vec<Arc<Sink>>>,
    filter: RwLock<Option<Filter>>,
    error_handler: RwLock<Option<ErrorHandler>>,
    destroyed: AtomicBool,
    self_ref: Weak<Logger>,
}

impl Logger {
    pub fn new(name: &str, dispatcher: Weak<Dispatcher>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            name: Arc::from(name),
            dispatcher,
            sinks: Mutex::new(Vec::new()),
            filter: RwLock::new(None),
            error_handler: RwLock::new(None),
            destroyed: AtomicBool::new(false),
            self_ref: me.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Produce one record.
    ///
    /// # Errors
    ///
    /// Fails on a destroyed logger or a dropped dispatcher/pool. When an
    /// error handler is installed the error is routed there instead and
    /// `Ok(())` is returned.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        match self.log_inner(level, message.into()) {
            Ok(()) => Ok(()),
            Err(error) => {
                let handler = self.error_handler.read();
                match handler.as_ref() {
                    Some(handler) => {
                        handler(&error);
                        Ok(())
                    }
                    None => Err(error),
                }
            }
        }
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Trace, message)
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Fatal, message)
    }

    /// Attach a sink. Attaching the same sink twice fails.
    pub fn add_sink(&self, sink: Arc<Sink>) -> Result<()> {
        let mut sinks = self.sinks.lock();

        if sinks.iter().any(|existing| Arc::ptr_eq(existing, &sink)) {
            return Err(LogError::DuplicateSink {
                name: sink.name().to_string(),
            });
        }

        sinks.push(sink);
        Ok(())
    }

    /// Detach the sink with the given name.
    pub fn delete_sink(&self, name: &str) -> Result<()> {
        let mut sinks = self.sinks.lock();

        match sinks.iter().position(|sink| sink.name() == name) {
            Some(index) => {
                sinks.remove(index);
                Ok(())
            }
            None => Err(LogError::SinkNotAttached {
                name: name.to_string(),
            }),
        }
    }

    /// Detach a specific sink by identity.
    pub fn delete_sink_ref(&self, sink: &Arc<Sink>) -> Result<()> {
        let mut sinks = self.sinks.lock();

        match sinks.iter().position(|existing| Arc::ptr_eq(existing, sink)) {
            Some(index) => {
                sinks.remove(index);
                Ok(())
            }
            None => Err(LogError::SinkNotAttached {
                name: sink.name().to_string(),
            }),
        }
    }

    pub fn find_sink(&self, name: &str) -> Option<Arc<Sink>> {
        self.sinks
            .lock()
            .iter()
            .find(|sink| sink.name() == name)
            .cloned()
    }

    pub fn set_filter(&self, filter: Option<Filter>) {
        *self.filter.write() = filter;
    }

    pub fn set_error_handler(&self, handler: Option<ErrorHandler>) {
        *self.error_handler.write() = handler;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_destroyed(&self) {
        self.destroyed.store(true, Ordering::Relaxed);
    }

    /// Fan one dispatcher run out to every attached sink. The slice is the
    /// dispatcher's tray; sinks copy what they keep.
    pub(crate) fn deliver_to_sinks(&self, envelopes: &[SharedEnvelope]) -> Result<()> {
        if envelopes.is_empty() {
            return Ok(());
        }

        let sinks = self.sinks.lock();
        for sink in sinks.iter() {
            sink.log(envelopes)?;
        }
        Ok(())
    }

    fn log_inner(&self, level: LogLevel, message: String) -> Result<()> {
        if self.destroyed.load(Ordering::Relaxed) {
            return Err(LogError::LoggerDestroyed {
                name: self.name.to_string(),
            });
        }

        let dispatcher = self
            .dispatcher
            .upgrade()
            .ok_or_else(|| LogError::resource_gone("dispatcher"))?;

        let envelope: SharedEnvelope = Arc::new(Envelope::new(
            Arc::clone(&self.name),
            Record::new(level, message),
        ));

        if !self.should_log(&envelope) {
            return Ok(());
        }

        let me = self
            .self_ref
            .upgrade()
            .ok_or_else(|| LogError::resource_gone("logger"))?;

        dispatcher.enqueue(me, envelope)
    }

    fn should_log(&self, envelope: &Envelope) -> bool {
        self.filter
            .read()
            .as_ref()
            .map_or(true, |filter| filter(&envelope.logger_name, &envelope.record))
    }
}
