//! Terminal facts gathered once per command.

use std::io::IsTerminal;

use super::mode::OutputMode;

/// What the terminal supports and how output should look.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub is_tty: bool,
    pub color: bool,
    pub unicode: bool,
    pub mode: OutputMode,
}

impl UiContext {
    /// Inspect stdout, `TERM` and `NO_COLOR`, then apply the global flags.
    pub fn from_env(json_flag: bool, no_color_flag: bool, ascii_flag: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").is_ok_and(|term| term == "dumb");
        let no_color_env = std::env::var_os("NO_COLOR").is_some();

        Self {
            is_tty,
            color: color_enabled(is_tty, term_is_dumb, no_color_flag || no_color_env),
            unicode: !ascii_flag,
            mode: OutputMode::resolve(json_flag, is_tty, term_is_dumb),
        }
    }

    /// Prompts need a terminal on both stdin and stdout.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && std::io::stdin().is_terminal()
    }

    /// Spinners only draw in pretty mode on a terminal.
    pub fn allows_animation(&self) -> bool {
        self.is_tty && self.mode.is_pretty()
    }
}

fn color_enabled(is_tty: bool, term_is_dumb: bool, color_refused: bool) -> bool {
    is_tty && !term_is_dumb && !color_refused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag_selects_json() {
        let ctx = UiContext::from_env(true, false, false);
        assert_eq!(ctx.mode, OutputMode::Json);
        assert!(!ctx.allows_animation());
    }

    #[test]
    fn test_ascii_flag() {
        assert!(!UiContext::from_env(false, false, true).unicode);
        assert!(UiContext::from_env(false, false, false).unicode);
    }

    #[test]
    fn test_no_color_flag() {
        assert!(!UiContext::from_env(false, true, false).color);
    }

    #[test]
    fn test_color_needs_capable_terminal() {
        assert!(color_enabled(true, false, false));
        assert!(!color_enabled(false, false, false));
        assert!(!color_enabled(true, true, false));
        assert!(!color_enabled(true, false, true));
    }
}
