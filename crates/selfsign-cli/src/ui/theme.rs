//! Theme definitions for colors, symbols, and badges.

use owo_colors::{OwoColorize, Style};

/// Badge types for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Err,
}

impl Badge {
    /// Get badge with symbol for display.
    pub fn display(&self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Self::Ok, true) => "[\u{2713}]",   // [✓]
            (Self::Warn, true) => "[\u{26A0}]", // [⚠]
            (Self::Err, true) => "[\u{2717}]",  // [✗]
            (Self::Ok, false) => "[OK]",
            (Self::Warn, false) => "[WARN]",
            (Self::Err, false) => "[ERR]",
        }
    }

    /// Color style for this badge.
    pub fn style(&self) -> Style {
        match self {
            Self::Ok => styles::success(),
            Self::Warn => styles::warning(),
            Self::Err => styles::error(),
        }
    }
}

/// Apply `style` to `text` when color is enabled.
pub fn styled(text: &str, style: Style, color: bool) -> String {
    if color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Named styles used across commands.
pub mod styles {
    use owo_colors::Style;

    /// Labels, metadata
    pub fn dim() -> Style {
        Style::new().dimmed()
    }

    pub fn bold() -> Style {
        Style::new().bold()
    }

    pub fn success() -> Style {
        Style::new().green().bold()
    }

    pub fn warning() -> Style {
        Style::new().yellow().bold()
    }

    pub fn error() -> Style {
        Style::new().red().bold()
    }
}

/// Spinner frames for unicode and ASCII terminals.
///
/// The last frame is shown once the spinner finishes.
pub fn spinner_frames(unicode: bool) -> &'static [&'static str] {
    if unicode {
        &[
            "\u{280B}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283C}", "\u{2834}", "\u{2826}",
            "\u{2827}", "\u{2807}", "\u{280F}", " ",
        ]
    } else {
        &["|", "/", "-", "\\", " "]
    }
}
