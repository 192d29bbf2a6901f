// src/sensors/mod.rs

// Facades over the generic engine, one per part on the board.
mod cache;
pub mod lps331ap;
pub mod sht21;

// --- Public Re-exports ---
pub use cache::Measurement;
pub use lps331ap::Lps331ap;
pub use sht21::Sht21;
