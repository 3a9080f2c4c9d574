//! Order Module
//!
//! Types describing what the visitor is ordering:
//! - Cart lines and their selected options
//! - Derived order totals
//! - Payment method, form data and outcome

pub mod payment;
pub mod summary;
pub mod types;

// Re-exports
pub use payment::{PaymentField, PaymentForm, PaymentMethod, PaymentOutcome};
pub use summary::OrderSummary;
pub use types::*;
