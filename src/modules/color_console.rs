//! Color console module rendering styled segments as ANSI escapes

use super::console::{ConsoleLock, ConsoleTarget};
use crate::core::error::Result;
use crate::core::formatter::{StyledFormatter, StyledText};
use crate::core::module::SinkModule;
use crate::core::record::Record;
use colored::Color;

/// Whether styled output is rendered with color escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Always emit escapes.
    On,
    /// Never emit escapes; segments are written as plain text.
    Off,
    /// Emit escapes iff the stream is attached to a terminal.
    Automatic,
}

/// Writes styled records to stdout or stderr with 4-bit ANSI colors.
pub struct ColorConsoleModule {
    target: ConsoleTarget,
    formatter: Box<dyn StyledFormatter>,
    lock: ConsoleLock,
    color_enabled: bool,
}

impl ColorConsoleModule {
    pub fn new(target: ConsoleTarget, formatter: Box<dyn StyledFormatter>, mode: ColorMode) -> Self {
        Self::with_lock(target, formatter, mode, ConsoleLock::Shared)
    }

    pub fn with_lock(
        target: ConsoleTarget,
        formatter: Box<dyn StyledFormatter>,
        mode: ColorMode,
        lock: ConsoleLock,
    ) -> Self {
        Self {
            target,
            formatter,
            lock,
            color_enabled: resolve_color(target, mode),
        }
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_enabled = resolve_color(self.target, mode);
    }

    pub fn is_color_enabled(&self) -> bool {
        self.color_enabled
    }
}

impl SinkModule for ColorConsoleModule {
    fn write(&mut self, logger_name: &str, record: &Record) -> Result<()> {
        let segments = self.formatter.format(logger_name, record)?;
        let rendered = render_segments(&segments, self.color_enabled);

        let _guard = self.lock.acquire();
        self.target.write_all(rendered.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let _guard = self.lock.acquire();
        self.target.flush()?;
        Ok(())
    }
}

fn resolve_color(target: ConsoleTarget, mode: ColorMode) -> bool {
    match mode {
        ColorMode::On => true,
        ColorMode::Off => false,
        ColorMode::Automatic => target.is_terminal(),
    }
}

fn render_segments(segments: &[StyledText], color: bool) -> String {
    let mut buffer = String::with_capacity(segments.iter().map(|s| s.text.len()).sum());

    for segment in segments {
        if !color || segment.style.is_plain() {
            buffer.push_str(&segment.text);
            continue;
        }

        if let Some(foreground) = segment.style.foreground {
            push_escape(&mut buffer, foreground, false);
        }
        if let Some(background) = segment.style.background {
            push_escape(&mut buffer, background, true);
        }
        buffer.push_str(&segment.text);
        buffer.push_str("\x1b[0m");
    }

    buffer
}

fn push_escape(buffer: &mut String, color: Color, background: bool) {
    use std::fmt::Write;

    // aixterm scheme: 30-37/90-97 foreground, +10 for background
    let offset: u16 = if background { 10 } else { 0 };
    let code: u16 = match color {
        Color::Black => 30,
        Color::Red => 31,
        Color::Green => 32,
        Color::Yellow => 33,
        Color::Blue => 34,
        Color::Magenta => 35,
        Color::Cyan => 36,
        Color::White => 37,
        Color::BrightBlack => 90,
        Color::BrightRed => 91,
        Color::BrightGreen => 92,
        Color::BrightYellow => 93,
        Color::BrightBlue => 94,
        Color::BrightMagenta => 95,
        Color::BrightCyan => 96,
        Color::BrightWhite => 97,
        Color::TrueColor { r, g, b } => {
            let channel = if background { 48 } else { 38 };
            let _ = write!(buffer, "\x1b[{channel};2;{r};{g};{b}m");
            return;
        }
    };

    let _ = write!(buffer, "\x1b[{}m", code + offset);
}
