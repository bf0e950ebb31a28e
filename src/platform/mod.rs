//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Frame timing (capped dt, revocable frame loop)
//! - Storage (JSON file natively, LocalStorage on web)

pub mod clock;
pub mod storage;

pub use clock::{FrameClock, FrameLoop, FrameToken};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
