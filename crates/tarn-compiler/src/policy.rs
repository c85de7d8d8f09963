//! Compilation policy.

use serde::Deserialize;
use tarn_core::MAX_STATE_LIMIT;

/// Knobs for one compilation. Missing JSON fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilationPolicy {
    /// Emit length and required-substring prefilters.
    pub enable_literal_factoring: bool,
    /// Merge byte classes with identical columns.
    pub enable_byte_class_compression: bool,
    /// Keep a statistics report and artifact dump with the result.
    pub emit_diagnostics: bool,
    /// Most states any single DFA may have. Clamped to `MAX_STATE_LIMIT`.
    pub state_limit: usize,
}

impl Default for CompilationPolicy {
    fn default() -> Self {
        Self {
            enable_literal_factoring: true,
            enable_byte_class_compression: true,
            emit_diagnostics: false,
            state_limit: MAX_STATE_LIMIT,
        }
    }
}

impl CompilationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn literal_factoring(mut self, value: bool) -> Self {
        self.enable_literal_factoring = value;
        self
    }

    pub fn byte_class_compression(mut self, value: bool) -> Self {
        self.enable_byte_class_compression = value;
        self
    }

    pub fn diagnostics(mut self, value: bool) -> Self {
        self.emit_diagnostics = value;
        self
    }

    pub fn state_limit(mut self, value: usize) -> Self {
        self.state_limit = value;
        self
    }

    /// The state cap actually applied.
    pub fn effective_state_limit(&self) -> usize {
        self.state_limit.min(MAX_STATE_LIMIT)
    }
}
