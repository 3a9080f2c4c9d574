//! Shared types for the kiosk engine
//!
//! Plain data used by every layer: catalog items, workflow steps, session
//! preferences, cart lines, payment types and the unified error type.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use error::{ErrorCategory, ErrorCode, KioskError, KioskResult};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
