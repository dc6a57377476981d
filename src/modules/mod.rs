//! Sink module implementations

pub mod color_console;
pub mod console;
pub mod file;
pub mod file_util;
pub mod null;
pub mod rotating_file;
pub mod writer;

pub use color_console::{ColorConsoleModule, ColorMode};
pub use console::{ConsoleLock, ConsoleModule, ConsoleTarget};
pub use file::{FileModule, FileOpenMode};
pub use file_util::{ensure_parent_dir, split_file_extension};
pub use null::NullModule;
pub use rotating_file::{RotatingFileModule, RotationMode, RotationPolicy};
pub use writer::WriterModule;

// Re-export the trait next to its implementations
pub use crate::core::SinkModule;
