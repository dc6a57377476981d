//! User-supplied predicates and handlers

use super::error::LogError;
use super::level::LogLevel;
use super::record::Record;
use std::sync::Arc;

/// Decides whether a record passes a logger or sink.
///
/// Evaluated on the producer path (logger) or the dispatch path (sink); keep
/// it cheap and side-effect free.
pub type Filter = Box<dyn Fn(&str, &Record) -> bool + Send + Sync>;

/// Decides whether the sink's module is flushed after writing a record.
pub type Flusher = Box<dyn Fn(&str, &Record) -> bool + Send + Sync>;

/// Receives errors raised on worker threads or suppressed inside `log`.
pub type ErrorHandler = Arc<dyn Fn(&LogError) + Send + Sync>;

/// Build a filter that accepts records at or above `min`.
pub fn level_filter(min: LogLevel) -> Filter {
    Box::new(move |_: &str, record: &Record| record.level >= min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        let filter = level_filter(LogLevel::Warn);

        assert!(!filter("net", &Record::new(LogLevel::Info, "m")));
        assert!(filter("net", &Record::new(LogLevel::Warn, "m")));
        assert!(filter("net", &Record::new(LogLevel::Fatal, "m")));
    }
}
