//! Data models
//!
//! Catalog, workflow and preference types shared by the engine and any
//! presentation layer (serialized as JSON).

pub mod catalog;
pub mod filter;
pub mod preferences;
pub mod workflow;

// Re-exports
pub use catalog::*;
pub use filter::*;
pub use preferences::*;
pub use workflow::*;
