//! Single-file module

use super::file_util::ensure_parent_dir;
use crate::core::error::{LogError, Result};
use crate::core::formatter::Formatter;
use crate::core::module::SinkModule;
use crate::core::record::Record;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// How an existing file is treated on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOpenMode {
    /// Keep existing content, write at the end.
    Append,
    /// Discard existing content.
    Truncate,
}

pub(crate) fn open_log_file(path: &Path, mode: FileOpenMode) -> Result<File> {
    ensure_parent_dir(path)?;

    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        FileOpenMode::Append => options.append(true),
        FileOpenMode::Truncate => options.write(true).truncate(true),
    };

    options
        .open(path)
        .map_err(|e| LogError::io_operation("opening", path.display().to_string(), e))
}

/// Writes formatted records to one file through a buffered writer.
pub struct FileModule {
    path: PathBuf,
    writer: BufWriter<File>,
    formatter: Box<dyn Formatter>,
}

impl FileModule {
    /// Open `path` in `mode`, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns an IO error when the file cannot be opened.
    pub fn new(
        path: impl Into<PathBuf>,
        mode: FileOpenMode,
        formatter: Box<dyn Formatter>,
    ) -> Result<Self> {
        let path = path.into();
        let file = open_log_file(&path, mode)?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            formatter,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SinkModule for FileModule {
    fn write(&mut self, logger_name: &str, record: &Record) -> Result<()> {
        let formatted = self.formatter.format(logger_name, record)?;

        self.writer
            .write_all(formatted.as_bytes())
            .map_err(|e| LogError::io_operation("writing", self.path.display().to_string(), e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LogError::io_operation("flushing", self.path.display().to_string(), e))
    }
}

impl Drop for FileModule {
    fn drop(&mut self) {
        // Ensure buffered data reaches the file even without a final flush
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::TextFormatter;
    use crate::core::level::LogLevel;
    use std::fs;
    use tempfile::tempdir;

    fn module(path: &Path, mode: FileOpenMode) -> FileModule {
        FileModule::new(path, mode, Box::new(TextFormatter::new())).unwrap()
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old\n").unwrap();

        let mut file = module(&path, FileOpenMode::Append);
        file.write("app", &Record::new(LogLevel::Info, "new"))
            .unwrap();
        file.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("old\n"));
        assert!(content.ends_with("new\n"));
    }

    #[test]
    fn test_truncate_discards_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old\n").unwrap();

        let mut file = module(&path, FileOpenMode::Truncate);
        file.write("app", &Record::new(LogLevel::Info, "new"))
            .unwrap();
        file.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("old"));
        assert!(content.ends_with("new\n"));
    }

    #[test]
    fn test_parent_directories_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deep/app.log");

        let _file = module(&path, FileOpenMode::Append);
        assert!(path.exists());
    }

    #[test]
    fn test_drop_flushes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        {
            let mut file = module(&path, FileOpenMode::Truncate);
            file.write("app", &Record::new(LogLevel::Info, "buffered"))
                .unwrap();
        }

        assert!(fs::read_to_string(&path).unwrap().contains("buffered"));
    }
}
