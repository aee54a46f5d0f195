//! Class tree configuration.

use serde::Deserialize;

/// Tuning knobs for a [`ClassTree`](crate::class::ClassTree).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Resolution walks over extends chains longer than this log a warning.
    pub chain_depth_warning: usize,
    /// Reject `extend` calls that would close an inheritance cycle longer
    /// than a self-extend. Resolution is cycle-safe either way.
    pub reject_extend_cycles: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            chain_depth_warning: 16,
            reject_extend_cycles: false,
        }
    }
}

impl TreeConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chain depth warning threshold (builder).
    pub fn with_chain_depth_warning(mut self, depth: usize) -> Self {
        self.chain_depth_warning = depth;
        self
    }

    /// Enable or disable extend cycle rejection (builder).
    pub fn with_reject_extend_cycles(mut self, reject: bool) -> Self {
        self.reject_extend_cycles = reject;
        self
    }
}
