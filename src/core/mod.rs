//! Core engine types and subsystems

pub mod bulk_queue;
pub mod callbacks;
pub mod dispatcher;
pub mod error;
pub mod formatter;
pub mod level;
pub mod logger;
pub mod manager;
pub mod module;
pub mod record;
pub mod sink;
pub mod worker_pool;

pub use bulk_queue::{BulkQueue, PairBulkQueue};
pub use callbacks::{level_filter, ErrorHandler, Filter, Flusher};
pub use dispatcher::Dispatcher;
pub use error::{LogError, Result};
pub use formatter::{
    ColorFormatter, Formatter, JsonFormatter, Style, StyledFormatter, StyledText, TextFormatter,
};
pub use level::LogLevel;
pub use logger::Logger;
pub use manager::Manager;
pub use module::SinkModule;
pub use record::{Envelope, Record, SharedEnvelope};
pub use sink::Sink;
pub use worker_pool::{Task, WorkerPool};
