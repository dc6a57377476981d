//! Formatters rendering records to bytes or styled segments

use super::error::{LogError, Result};
use super::record::Record;
use colored::Color;
use serde::Serialize;

/// Renders one record to a plain string.
///
/// Implemented for closures, so a sink module can take an ad-hoc
/// `|logger, record| Ok(format!(...))` as well as one of the named
/// formatters below.
pub trait Formatter: Send + Sync {
    fn format(&self, logger_name: &str, record: &Record) -> Result<String>;
}

impl<F> Formatter for F
where
    F: Fn(&str, &Record) -> Result<String> + Send + Sync,
{
    fn format(&self, logger_name: &str, record: &Record) -> Result<String> {
        self(logger_name, record)
    }
}

/// Foreground/background attributes for one styled segment.
///
/// `None` keeps the stream's original color for that channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl Style {
    pub fn foreground(color: Color) -> Self {
        Self {
            foreground: Some(color),
            background: None,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.foreground.is_none() && self.background.is_none()
    }
}

/// One run of text sharing a single style.
#[derive(Debug, Clone)]
pub struct StyledText {
    pub text: String,
    pub style: Style,
}

impl StyledText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Renders one record to an ordered list of styled segments, for
/// color-capable modules.
pub trait StyledFormatter: Send + Sync {
    fn format(&self, logger_name: &str, record: &Record) -> Result<Vec<StyledText>>;
}

impl<F> StyledFormatter for F
where
    F: Fn(&str, &Record) -> Result<Vec<StyledText>> + Send + Sync,
{
    fn format(&self, logger_name: &str, record: &Record) -> Result<Vec<StyledText>> {
        self(logger_name, record)
    }
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// The default line format: `[timestamp] [LEVEL] [logger] message\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for TextFormatter {
    fn format(&self, logger_name: &str, record: &Record) -> Result<String> {
        Ok(format!(
            "[{}] [{:5}] [{}] {}\n",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.level.to_str(),
            logger_name,
            record.message
        ))
    }
}

/// The default line format split into segments, with the level segment
/// colored according to its severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorFormatter;

impl ColorFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl StyledFormatter for ColorFormatter {
    fn format(&self, logger_name: &str, record: &Record) -> Result<Vec<StyledText>> {
        Ok(vec![
            StyledText::plain(format!("[{}] ", record.timestamp.format(TIMESTAMP_FORMAT))),
            StyledText::styled(
                format!("[{:5}]", record.level.to_str()),
                Style::foreground(record.level.color_code()),
            ),
            StyledText::plain(format!(" [{}] {}\n", logger_name, record.message)),
        ])
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    timestamp: &'a chrono::DateTime<chrono::Utc>,
    level: &'a str,
    logger: &'a str,
    message: &'a str,
}

/// One JSON object per record, newline-delimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, logger_name: &str, record: &Record) -> Result<String> {
        let line = JsonRecord {
            timestamp: &record.timestamp,
            level: record.level.to_str(),
            logger: logger_name,
            message: &record.message,
        };

        let mut rendered =
            serde_json::to_string(&line).map_err(|e| LogError::format(e.to_string()))?;
        rendered.push('\n');
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::LogLevel;

    #[test]
    fn test_text_formatter_shape() {
        let record = Record::new(LogLevel::Info, "hello");
        let line = TextFormatter::new().format("net", &record).unwrap();

        assert!(line.starts_with('['));
        assert!(line.contains("[INFO ]"));
        assert!(line.contains("[net]"));
        assert!(line.ends_with("hello\n"));
    }

    #[test]
    fn test_color_formatter_segments() {
        let record = Record::new(LogLevel::Error, "boom");
        let segments = ColorFormatter::new().format("net", &record).unwrap();

        assert_eq!(segments.len(), 3);
        assert!(segments[0].style.is_plain());
        assert_eq!(segments[1].style.foreground, Some(Color::Red));
        assert!(segments[2].text.ends_with("boom\n"));
    }

    #[test]
    fn test_json_formatter_is_one_object_per_line() {
        let record = Record::new(LogLevel::Warn, "careful");
        let line = JsonFormatter::new().format("net", &record).unwrap();

        assert!(line.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["logger"], "net");
        assert_eq!(value["message"], "careful");
    }

    #[test]
    fn test_closure_formatter() {
        let formatter =
            |logger: &str, record: &Record| -> Result<String> {
                Ok(format!("{logger}:{}", record.message))
            };
        let record = Record::new(LogLevel::Info, "m");
        assert_eq!(Formatter::format(&formatter, "n", &record).unwrap(), "n:m");
    }
}
