// src/common/timing.rs

use core::time::Duration;

// Nominal worst-case values from the datasheets. Poll intervals sit at or
// slightly above the maximum conversion time so a healthy part is ready on
// the first re-check.

// === Engine defaults ===

/// Default bound on any single wait-for-ready loop.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(1);

// === SHT21 (datasheet v4, table 7) ===

/// Settle time after a soft reset (datasheet: max 15 ms).
pub const SHT21_SOFT_RESET_TIME: Duration = Duration::from_millis(50);
/// 14-bit temperature conversion (typ 66 ms, max 85 ms).
pub const SHT21_TEMPERATURE_CONVERSION: Duration = Duration::from_millis(86);
/// 12-bit humidity conversion (typ 22 ms, max 29 ms).
pub const SHT21_HUMIDITY_CONVERSION: Duration = Duration::from_millis(30);

// === LPS331AP (datasheet rev 4, table 3 and one-shot timing) ===

/// One-shot conversion at the highest resolution takes 41.545 ms.
pub const LPS331AP_ONE_SHOT_CONVERSION: Duration = Duration::from_millis(42);
/// Re-check interval while the BOOT bit is set after a soft reset.
pub const LPS331AP_BOOT_POLL_INTERVAL: Duration = Duration::from_millis(50);
