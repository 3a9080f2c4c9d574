//! Cart and pricing
//!
//! - [`cart`]: the cart store (add / merge, quantity, edit, remove, clear)
//! - [`money`]: pure pricing functions (unit price, order summary)

pub mod cart;
pub mod money;

pub use cart::Cart;
pub use money::{Selections, format_price, round_money, selected_options, summarize, unit_price};
