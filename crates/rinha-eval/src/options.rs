//! Evaluator configuration.

use serde::{Deserialize, Serialize};

/// Default bound on nested function calls.
pub const DEFAULT_MAX_DEPTH: usize = 100_000;

/// Limits and policies for a single evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Maximum number of simultaneously active calls.
    pub max_depth: usize,
    /// Maximum number of evaluated terms. `None` is unlimited.
    pub max_steps: Option<u64>,
    /// Allow `<`, `>`, `<=`, `>=` between two texts (byte-wise).
    pub text_ordering: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_steps: None,
            text_ordering: false,
        }
    }
}

impl EvalOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_text_ordering(mut self, enabled: bool) -> Self {
        self.text_ordering = enabled;
        self
    }
}
