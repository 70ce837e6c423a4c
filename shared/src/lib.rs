//! Shared types for the BTN restaurant device node
//!
//! Data models stored on the device, the unified error system, and small
//! utilities used across crates.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
