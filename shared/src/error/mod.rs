//! Unified error system for the kiosk engine
//!
//! - [`ErrorCode`]: stable numeric codes for every failure
//! - [`ErrorCategory`]: classification of codes by domain
//! - [`KioskError`]: the error type returned by engine operations
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Cart errors
//! - 2xxx: Customization errors
//! - 3xxx: Navigation errors
//! - 4xxx: Payment errors
//! - 5xxx: Catalog and configuration errors
//!
//! Most of these are expected control-flow outcomes (a required option not
//! picked, an empty cart at checkout). The engine converts them into a
//! localized notification through [`KioskError::message_key`]; none of them
//! is ever shown to the visitor as a technical error.

mod category;
mod codes;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};

use crate::models::Step;
use crate::order::{LineId, PaymentField};
use thiserror::Error;

/// Result alias used across the engine
pub type KioskResult<T> = Result<T, KioskError>;

/// Engine error
#[derive(Debug, Clone, Error, PartialEq)]
pub enum KioskError {
    #[error("Cart line not found: {0}")]
    LineNotFound(LineId),

    #[error("Cart is empty")]
    CartEmpty,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Required option has no selection: {0}")]
    RequiredOptionMissing(String),

    #[error("Unknown option group: {0}")]
    UnknownOptionGroup(String),

    #[error("Unknown choice '{choice}' in option group '{group}'")]
    UnknownChoice { group: String, choice: String },

    #[error("Customization is not on the review step")]
    WizardNotOnReview,

    #[error("No customization in progress")]
    WizardNotOpen,

    #[error("Item {0} requires customization")]
    CustomizationRequired(i64),

    #[error("Operation requires step {expected}, current step is {actual}")]
    WrongStep { expected: Step, actual: Step },

    #[error("Step {0} is not part of the workflow")]
    StepNotInFlow(Step),

    #[error("A payment is already in progress")]
    PaymentPending,

    #[error("Invalid payment field: {0}")]
    InvalidPaymentForm(PaymentField),

    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    #[error("Menu item not found: {0}")]
    ItemNotFound(i64),

    #[error("Failed to load data: {0}")]
    DataLoad(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },
}

impl KioskError {
    /// Stable error code
    pub fn code(&self) -> ErrorCode {
        match self {
            KioskError::LineNotFound(_) => ErrorCode::LineNotFound,
            KioskError::CartEmpty => ErrorCode::CartEmpty,
            KioskError::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            KioskError::RequiredOptionMissing(_) => ErrorCode::RequiredOptionMissing,
            KioskError::UnknownOptionGroup(_) => ErrorCode::UnknownOptionGroup,
            KioskError::UnknownChoice { .. } => ErrorCode::UnknownChoice,
            KioskError::WizardNotOnReview => ErrorCode::WizardNotOnReview,
            KioskError::WizardNotOpen => ErrorCode::WizardNotOpen,
            KioskError::CustomizationRequired(_) => ErrorCode::CustomizationRequired,
            KioskError::WrongStep { .. } => ErrorCode::WrongStep,
            KioskError::StepNotInFlow(_) => ErrorCode::StepNotInFlow,
            KioskError::PaymentPending => ErrorCode::PaymentPending,
            KioskError::InvalidPaymentForm(_) => ErrorCode::InvalidPaymentForm,
            KioskError::PaymentDeclined(_) => ErrorCode::PaymentDeclined,
            KioskError::ItemNotFound(_) => ErrorCode::ItemNotFound,
            KioskError::DataLoad(_) => ErrorCode::DataLoadFailed,
            KioskError::InvalidConfig { .. } => ErrorCode::InvalidConfig,
        }
    }

    /// Category of the error code
    pub fn category(&self) -> ErrorCategory {
        self.code().category()
    }

    /// Translation key of the visitor-facing message
    pub fn message_key(&self) -> &'static str {
        match self {
            KioskError::CartEmpty => "cart_empty_warning",
            KioskError::RequiredOptionMissing(_) => "required_option_missing",
            KioskError::CustomizationRequired(_) => "customize_your_order",
            KioskError::PaymentPending => "payment_processing",
            KioskError::InvalidPaymentForm(field) => field.message_key(),
            KioskError::PaymentDeclined(_) => "payment_failed",
            _ => "something_went_wrong",
        }
    }
}
