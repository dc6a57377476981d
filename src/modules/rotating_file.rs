//! Rotating file module with size-based archive rotation

use super::file::{open_log_file, FileOpenMode};
use super::file_util::split_file_extension;
use crate::core::error::{LogError, Result};
use crate::core::formatter::Formatter;
use crate::core::module::SinkModule;
use crate::core::record::Record;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Size and archive-count limits for a rotating file.
#[derive(Debug, Clone)]
pub struct RotationPolicy {
    /// Rotation triggers when the current size plus the incoming record
    /// would reach this many bytes.
    pub max_file_size: u64,
    /// Number of archive files kept next to the base file.
    pub max_archives: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10 MB
            max_archives: 5,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_archives(mut self, count: usize) -> Self {
        self.max_archives = count;
        self
    }
}

/// What to do when the base file already exists at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// Keep appending to the existing file until it fills up.
    AppendPrevious,
    /// Rotate the existing file away and start fresh.
    CreateNewFile,
}

/// Writes formatted records to `X.ext`, archiving it as `X-1.ext` …
/// `X-N.ext` whenever it fills up.
///
/// Rotation renames `X-(N-1).ext` to `X-N.ext` (overwriting the oldest
/// archive), down to `X.ext` becoming `X-1.ext`, then reopens a fresh base
/// file in append mode.
pub struct RotatingFileModule {
    path: PathBuf,
    stem: PathBuf,
    extension: String,
    policy: RotationPolicy,
    current_size: u64,
    writer: Option<BufWriter<File>>,
    formatter: Box<dyn Formatter>,
}

impl RotatingFileModule {
    /// Open a rotating file over `path`.
    ///
    /// # Errors
    ///
    /// Rejects a zero `max_file_size` or `max_archives`; IO failures while
    /// opening or rotating surface as IO errors.
    pub fn new(
        path: impl Into<PathBuf>,
        policy: RotationPolicy,
        mode: RotationMode,
        formatter: Box<dyn Formatter>,
    ) -> Result<Self> {
        if policy.max_file_size == 0 {
            return Err(LogError::rotation("max_file_size must be positive"));
        }
        if policy.max_archives == 0 {
            return Err(LogError::rotation("max_archives must be positive"));
        }

        let path = path.into();
        let (stem, extension) = split_file_extension(&path);
        let existed = path.exists();

        let mut module = Self {
            path,
            stem,
            extension,
            policy,
            current_size: 0,
            writer: None,
            formatter,
        };
        module.open()?;

        if existed && (mode == RotationMode::CreateNewFile || module.should_rotate(0)) {
            module.rotate()?;
        }

        Ok(module)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Path of archive `index`; index 0 is the base file.
    pub fn archive_path(&self, index: usize) -> PathBuf {
        if index == 0 {
            return self.path.clone();
        }

        let mut name = self.stem.clone().into_os_string();
        name.push(format!("-{index}"));
        name.push(&self.extension);
        PathBuf::from(name)
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        self.current_size + incoming >= self.policy.max_file_size
    }

    fn open(&mut self) -> Result<()> {
        let file = open_log_file(&self.path, FileOpenMode::Append)?;

        self.current_size = file
            .metadata()
            .map_err(|e| LogError::io_operation("reading size of", self.path.display().to_string(), e))?
            .len();
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    fn rotate(&mut self) -> Result<()> {
        // Release the handle before renaming; some platforms refuse to move
        // an open file.
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|e| LogError::io_operation("flushing", self.path.display().to_string(), e))?;
        }

        self.rotate_archives()?;
        self.open()
    }

    fn rotate_archives(&self) -> Result<()> {
        for index in (1..=self.policy.max_archives).rev() {
            let source = self.archive_path(index - 1);
            if !source.exists() {
                continue;
            }

            let target = self.archive_path(index);
            fs::rename(&source, &target)
                .map_err(|e| LogError::io_operation("rotating", source.display().to_string(), e))?;
        }
        Ok(())
    }
}

impl SinkModule for RotatingFileModule {
    fn write(&mut self, logger_name: &str, record: &Record) -> Result<()> {
        let formatted = self.formatter.format(logger_name, record)?;
        let incoming = formatted.len() as u64;

        if self.should_rotate(incoming) {
            self.rotate()?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LogError::other("rotating file writer not initialized"))?;
        writer
            .write_all(formatted.as_bytes())
            .map_err(|e| LogError::io_operation("writing", self.path.display().to_string(), e))?;

        self.current_size += incoming;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer
                .flush()
                .map_err(|e| LogError::io_operation("flushing", self.path.display().to_string(), e))?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileModule {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
