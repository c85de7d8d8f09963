//! ANSI color codes for dumps and traces.
//!
//! - Section: `[classes]`, `[dfa ...]` headers
//! - Label: routine names and jump labels
//! - Accept: accepting states and successful halts
//! - Dim: comments, register values, byte ranges

/// ANSI palette. `Colors::OFF` renders plain text.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub section: &'static str,
    pub label: &'static str,
    pub accept: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        section: "\x1b[34m",
        label: "\x1b[36m",
        accept: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        section: "",
        label: "",
        accept: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }
}
