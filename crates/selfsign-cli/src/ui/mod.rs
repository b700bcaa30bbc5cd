//! UI primitives for the SelfSign CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens and owo-colors styles
//! - **Render**: Headers, receipts, hints, key-value lines
//! - **Progress**: Spinner for key generation
//! - **Format**: Datetime and text helpers
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{receipt, UiContext};
//!
//! let ctx = UiContext::from_env(args.json, cli.no_color, cli.ascii);
//!
//! if ctx.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! println!("{}", receipt(&ctx, "Identity generated", &items));
//! ```

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{badge, blank_line, header, hint, kv, print, print_error, receipt};

pub use progress::Spinner;

pub use format::format_datetime;
