//! Module writing to an arbitrary `io::Write`

use crate::core::error::Result;
use crate::core::formatter::Formatter;
use crate::core::module::SinkModule;
use crate::core::record::Record;
use std::io::Write;

/// Writes formatted records into any writer: an in-memory buffer, a pipe, a
/// socket. Useful for tests and custom transports.
pub struct WriterModule<W> {
    writer: W,
    formatter: Box<dyn Formatter>,
}

impl<W: Write + Send + Sync> WriterModule<W> {
    pub fn new(writer: W, formatter: Box<dyn Formatter>) -> Self {
        Self { writer, formatter }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> SinkModule for WriterModule<W> {
    fn write(&mut self, logger_name: &str, record: &Record) -> Result<()> {
        let formatted = self.formatter.format(logger_name, record)?;
        self.writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::TextFormatter;
    use crate::core::level::LogLevel;

    #[test]
    fn test_writes_into_buffer() {
        let mut module = WriterModule::new(Vec::new(), Box::new(TextFormatter::new()));

        module
            .write("buffered", &Record::new(LogLevel::Info, "captured"))
            .unwrap();
        module.flush().unwrap();

        let content = String::from_utf8(module.into_inner()).unwrap();
        assert!(content.contains("[buffered]"));
        assert!(content.ends_with("captured\n"));
    }
}
