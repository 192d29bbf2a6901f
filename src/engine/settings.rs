// src/engine/settings.rs

use crate::common::timing;
use core::time::Duration;

/// Runtime configuration for a [`ProtocolEngine`](super::ProtocolEngine).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineSettings {
    /// Upper bound on every wait-for-ready loop (conversion and reset alike).
    pub timeout: Duration,
}

impl EngineSettings {
    pub const fn new() -> Self {
        EngineSettings {
            timeout: timing::DEFAULT_READY_TIMEOUT,
        }
    }

    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::new()
    }
}
