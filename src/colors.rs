use std::io::{self, IsTerminal};

const RESET: &str = "\x1b[0m";

/// ANSI escape codes for report output; all empty when colors are off.
#[derive(Clone, Copy)]
pub struct Colors {
    pub fail: &'static str,
    pub warning: &'static str,
    pub pass: &'static str,
    pub check: &'static str,
    enabled: bool,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                fail: "\x1b[31m",    // Red
                warning: "\x1b[33m", // Yellow
                pass: "\x1b[32m",    // Green
                check: "\x1b[2m",    // Dim
                enabled: true,
            }
        } else {
            Self {
                fail: "",
                warning: "",
                pass: "",
                check: "",
                enabled: false,
            }
        }
    }

    pub fn reset(&self) -> &'static str {
        if self.enabled {
            RESET
        } else {
            ""
        }
    }

    /// Wrap `text` in `color` followed by a reset.
    pub fn paint(&self, color: &str, text: &str) -> String {
        format!("{color}{text}{}", self.reset())
    }
}

pub fn should_use_colors(force_color: bool, no_color: bool) -> bool {
    // Priority: --no-color > --color > NO_COLOR env > TTY detection
    if no_color {
        return false;
    }
    if force_color {
        return true;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stdout().is_terminal()
}
