//! Module discarding every record

use crate::core::error::Result;
use crate::core::module::SinkModule;
use crate::core::record::Record;

/// Discards everything; the measuring stick for pipeline overhead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullModule;

impl NullModule {
    pub fn new() -> Self {
        Self
    }
}

impl SinkModule for NullModule {
    fn write(&mut self, _logger_name: &str, _record: &Record) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
