//! # fanlog
//!
//! An asynchronous, multi-producer/multi-consumer logging engine. Producers
//! hand records to named loggers; a shared worker pool drains staging queues
//! and delivers every record to the sinks its logger fans out to, each sink
//! owning an independent output module and its own back-pressure.
//!
//! ## Features
//!
//! - **Decoupled producers**: `log` is two short lock acquisitions; all I/O
//!   happens later on the worker pool
//! - **Per-sink isolation**: one slow destination never blocks another
//! - **Per-logger ordering**: records from one logger reach each sink in
//!   production order
//! - **Pluggable backends**: file, rotating file, console (plain and color),
//!   arbitrary writers, null
//!
//! ## Example
//!
//! ```no_run
//! use fanlog::prelude::*;
//!
//! fn main() -> fanlog::Result<()> {
//!     let manager = Manager::new(2)?;
//!
//!     let sink = manager.new_sink(
//!         "app-file",
//!         Box::new(FileModule::new(
//!             "logs/app.log",
//!             FileOpenMode::Append,
//!             Box::new(TextFormatter::new()),
//!         )?),
//!     )?;
//!
//!     let logger = manager.new_logger("app")?;
//!     logger.add_sink(sink)?;
//!
//!     logger.info("service started")?;
//!     manager.wait_until_idle();
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod macros;
pub mod modules;

pub mod prelude {
    pub use crate::core::{
        level_filter, ColorFormatter, ErrorHandler, Filter, Flusher, Formatter, JsonFormatter,
        LogError, LogLevel, Logger, Manager, Record, Result, Sink, SinkModule, Style,
        StyledFormatter, StyledText, TextFormatter,
    };
    pub use crate::modules::{
        ColorConsoleModule, ColorMode, ConsoleLock, ConsoleModule, ConsoleTarget, FileModule,
        FileOpenMode, NullModule, RotatingFileModule, RotationMode, RotationPolicy, WriterModule,
    };
}

pub use crate::core::{
    level_filter, BulkQueue, ColorFormatter, Dispatcher, Envelope, ErrorHandler, Filter, Flusher,
    Formatter, JsonFormatter, LogError, LogLevel, Logger, Manager, PairBulkQueue, Record, Result,
    SharedEnvelope, Sink, SinkModule, Style, StyledFormatter, StyledText, Task, TextFormatter,
    WorkerPool,
};
pub use crate::modules::{
    ensure_parent_dir, split_file_extension, ColorConsoleModule, ColorMode, ConsoleLock,
    ConsoleModule, ConsoleTarget, FileModule, FileOpenMode, NullModule, RotatingFileModule,
    RotationMode, RotationPolicy, WriterModule,
};
