//! Plain console module and the process-wide console lock

use crate::core::error::Result;
use crate::core::formatter::Formatter;
use crate::core::module::SinkModule;
use crate::core::record::Record;
use parking_lot::{Mutex, MutexGuard};
use std::io::{IsTerminal, Write};

// One lock for the whole process: several console sinks writing to the same
// terminal must not tear each other's lines.
static CONSOLE_GUARD: Mutex<()> = Mutex::new(());

/// Whether a console module serializes against the process-wide lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLock {
    /// Take the shared lock around every write and flush.
    Shared,
    /// Skip locking; for single-threaded deployments.
    None,
}

impl ConsoleLock {
    pub(crate) fn acquire(&self) -> Option<MutexGuard<'static, ()>> {
        match self {
            ConsoleLock::Shared => Some(CONSOLE_GUARD.lock()),
            ConsoleLock::None => None,
        }
    }
}

/// The stream a console module writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

impl ConsoleTarget {
    pub(crate) fn write_all(&self, bytes: &[u8]) -> std::io::Result<()> {
        match self {
            ConsoleTarget::Stdout => std::io::stdout().write_all(bytes),
            ConsoleTarget::Stderr => std::io::stderr().write_all(bytes),
        }
    }

    pub(crate) fn flush(&self) -> std::io::Result<()> {
        match self {
            ConsoleTarget::Stdout => std::io::stdout().flush(),
            ConsoleTarget::Stderr => std::io::stderr().flush(),
        }
    }

    pub(crate) fn is_terminal(&self) -> bool {
        match self {
            ConsoleTarget::Stdout => std::io::stdout().is_terminal(),
            ConsoleTarget::Stderr => std::io::stderr().is_terminal(),
        }
    }
}

/// Writes formatted records to stdout or stderr.
pub struct ConsoleModule {
    target: ConsoleTarget,
    formatter: Box<dyn Formatter>,
    lock: ConsoleLock,
}

impl ConsoleModule {
    pub fn new(target: ConsoleTarget, formatter: Box<dyn Formatter>) -> Self {
        Self::with_lock(target, formatter, ConsoleLock::Shared)
    }

    pub fn with_lock(
        target: ConsoleTarget,
        formatter: Box<dyn Formatter>,
        lock: ConsoleLock,
    ) -> Self {
        Self {
            target,
            formatter,
            lock,
        }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl SinkModule for ConsoleModule {
    fn write(&mut self, logger_name: &str, record: &Record) -> Result<()> {
        let formatted = self.formatter.format(logger_name, record)?;

        let _guard = self.lock.acquire();
        self.target.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let _guard = self.lock.acquire();
        self.target.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::TextFormatter;
    use crate::core::level::LogLevel;

    #[test]
    fn test_console_module_writes_without_error() {
        let mut module =
            ConsoleModule::new(ConsoleTarget::Stdout, Box::new(TextFormatter::new()));

        module
            .write("console", &Record::new(LogLevel::Info, "to stdout"))
            .unwrap();
        module.flush().unwrap();
    }

    #[test]
    fn test_unlocked_variant_writes_without_error() {
        let mut module = ConsoleModule::with_lock(
            ConsoleTarget::Stderr,
            Box::new(TextFormatter::new()),
            ConsoleLock::None,
        );

        module
            .write("console", &Record::new(LogLevel::Error, "to stderr"))
            .unwrap();
    }

    #[test]
    fn test_shared_lock_is_reentrant_across_instances() {
        // Two modules taking the same global lock in sequence must not
        // deadlock each other.
        let mut first =
            ConsoleModule::new(ConsoleTarget::Stdout, Box::new(TextFormatter::new()));
        let mut second =
            ConsoleModule::new(ConsoleTarget::Stderr, Box::new(TextFormatter::new()));

        first
            .write("a", &Record::new(LogLevel::Info, "one"))
            .unwrap();
        second
            .write("b", &Record::new(LogLevel::Info, "two"))
            .unwrap();
    }
}
