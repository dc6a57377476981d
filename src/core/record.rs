//! Log record and the envelope transported through the engine

use super::level::LogLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// One log record as produced by a logger.
///
/// The record owns its content; the engine never looks past the severity.
/// Formatting is deferred to the sink side, so constructing a record stays
/// cheap on the producer thread.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Record {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A record paired with the name of the logger that produced it.
///
/// The name handle is allocated once per logger and cloned into every
/// envelope, so consumers can read the producer's name without reaching back
/// into the logger. Envelopes travel as [`SharedEnvelope`] so fanning one
/// record out to several sinks never copies it.
#[derive(Debug)]
pub struct Envelope {
    pub logger_name: Arc<str>,
    pub record: Record,
}

impl Envelope {
    pub fn new(logger_name: Arc<str>, record: Record) -> Self {
        Self {
            logger_name,
            record,
        }
    }
}

pub type SharedEnvelope = Arc<Envelope>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_owns_content() {
        let record = Record::new(LogLevel::Info, "hello");
        assert_eq!(record.level, LogLevel::Info);
        assert_eq!(record.message, "hello");
    }

    #[test]
    fn test_envelope_shares_name_handle() {
        let name: Arc<str> = Arc::from("net");
        let first = Envelope::new(Arc::clone(&name), Record::new(LogLevel::Debug, "a"));
        let second = Envelope::new(Arc::clone(&name), Record::new(LogLevel::Debug, "b"));

        assert!(Arc::ptr_eq(&first.logger_name, &second.logger_name));
    }
}
