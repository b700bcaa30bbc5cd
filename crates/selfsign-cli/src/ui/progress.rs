//! Progress indicators for long-running operations.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::context::UiContext;
use super::render::badge;
use super::theme::{spinner_frames, Badge};

/// A spinner for indeterminate progress.
///
/// Draws to stderr only when animation is allowed; otherwise it is silent so
/// plain and JSON output stay machine-readable.
pub struct Spinner<'a> {
    ctx: &'a UiContext,
    bar: Option<ProgressBar>,
}

impl<'a> Spinner<'a> {
    /// Create and start a spinner with the given message.
    pub fn start(ctx: &'a UiContext, message: &str) -> Self {
        if !ctx.allows_animation() {
            return Self { ctx, bar: None };
        }

        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(spinner_frames(ctx.unicode));
        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(format!("{}...", message));
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            ctx,
            bar: Some(bar),
        }
    }

    /// Finish spinner with success message.
    pub fn finish(self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
            eprintln!("{}", badge(self.ctx, Badge::Ok, message));
        }
    }

    /// Clear the spinner without a message (error paths).
    pub fn abandon(self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::OutputMode;

    #[test]
    fn test_spinner_is_silent_without_tty() {
        let ctx = UiContext {
            is_tty: false,
            color: false,
            unicode: false,
            mode: OutputMode::Plain,
        };
        let spinner = Spinner::start(&ctx, "Generating");
        assert!(spinner.bar.is_none());
        spinner.finish("done");
    }
}
