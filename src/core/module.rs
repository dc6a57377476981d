//! Backend trait consumed by sinks

use super::{error::Result, record::Record};

/// The output side of a sink.
///
/// A module renders and emits one record at a time and makes emitted bytes
/// durable on `flush`. Each module instance is owned exclusively by its sink,
/// which serializes all calls, so implementations need no internal locking.
pub trait SinkModule: Send + Sync {
    fn write(&mut self, logger_name: &str, record: &Record) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}
