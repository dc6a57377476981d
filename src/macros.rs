//! Logging macros for ergonomic message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. They expand to
//! the corresponding [`Logger`](crate::Logger) method call and return its
//! `Result`.
//!
//! # Examples
//!
//! ```
//! use fanlog::prelude::*;
//! use fanlog::info;
//!
//! let manager = Manager::new(1).unwrap();
//! let logger = manager.new_logger("app").unwrap();
//!
//! // Basic logging
//! info!(logger, "server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "listening on port {}", port).unwrap();
//!
//! manager.wait_until_idle();
//! ```

/// Log a message at an explicit level with automatic formatting.
///
/// # Examples
///
/// ```
/// # use fanlog::prelude::*;
/// # let manager = Manager::new(1).unwrap();
/// # let logger = manager.new_logger("app").unwrap();
/// use fanlog::log;
/// log!(logger, LogLevel::Info, "simple message").unwrap();
/// log!(logger, LogLevel::Error, "error code: {}", 500).unwrap();
/// # manager.wait_until_idle();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warn-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::Manager;

    #[test]
    fn test_macros_expand_to_logger_calls() {
        let manager = Manager::new(1).unwrap();
        let logger = manager.new_logger("macros").unwrap();

        crate::trace!(logger, "t {}", 1).unwrap();
        crate::debug!(logger, "d").unwrap();
        crate::info!(logger, "i {}", "x").unwrap();
        crate::warn!(logger, "w").unwrap();
        crate::error!(logger, "e").unwrap();
        crate::fatal!(logger, "f").unwrap();

        manager.wait_until_idle();
    }
}
