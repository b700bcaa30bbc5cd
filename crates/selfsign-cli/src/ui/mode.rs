//! How command results are written to stdout.

/// Output format for a single command run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One JSON document and nothing else
    Json,
    /// `key=value` lines for scripts
    #[default]
    Plain,
    /// Badges, colour and receipts for a terminal
    Pretty,
}

impl OutputMode {
    /// Pick the mode for this run.
    ///
    /// `--json` wins outright. Pretty output needs a real terminal on stdout
    /// that is not `TERM=dumb`; everything else gets plain lines.
    pub fn resolve(json_flag: bool, is_tty: bool, term_is_dumb: bool) -> Self {
        match (json_flag, is_tty && !term_is_dumb) {
            (true, _) => Self::Json,
            (false, true) => Self::Pretty,
            (false, false) => Self::Plain,
        }
    }

    pub fn is_json(&self) -> bool {
        *self == Self::Json
    }

    pub fn is_pretty(&self) -> bool {
        *self == Self::Pretty
    }
}
