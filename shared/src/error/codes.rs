//! Unified error codes for the kiosk engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Cart errors
//! - 2xxx: Customization (wizard) errors
//! - 3xxx: Navigation errors
//! - 4xxx: Payment errors
//! - 5xxx: Catalog and configuration errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 so presentation layers can switch on a stable number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 1xxx: Cart ====================
    /// Cart line not found
    LineNotFound = 1001,
    /// Cart is empty
    CartEmpty = 1002,
    /// Quantity out of range
    InvalidQuantity = 1003,

    // ==================== 2xxx: Customization ====================
    /// A required option group has no selection
    RequiredOptionMissing = 2001,
    /// Option group does not exist on the item
    UnknownOptionGroup = 2002,
    /// Choice does not exist in the option group
    UnknownChoice = 2003,
    /// Commit attempted before the review step
    WizardNotOnReview = 2004,
    /// No customization flow is open
    WizardNotOpen = 2005,
    /// Item must be customized before it can be added
    CustomizationRequired = 2006,

    // ==================== 3xxx: Navigation ====================
    /// Operation not allowed on the current step
    WrongStep = 3001,
    /// Step is not part of the configured flow
    StepNotInFlow = 3002,

    // ==================== 4xxx: Payment ====================
    /// A payment is already being processed
    PaymentPending = 4001,
    /// Payment form data is invalid
    InvalidPaymentForm = 4002,
    /// Payment was declined
    PaymentDeclined = 4003,

    // ==================== 5xxx: Catalog / Config ====================
    /// Catalog item not found
    ItemNotFound = 5001,
    /// Static data could not be loaded
    DataLoadFailed = 5002,
    /// Configuration value is invalid
    InvalidConfig = 5003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",

            ErrorCode::LineNotFound => "Cart line not found",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::InvalidQuantity => "Quantity is out of range",

            ErrorCode::RequiredOptionMissing => "A required option has no selection",
            ErrorCode::UnknownOptionGroup => "Option group does not exist",
            ErrorCode::UnknownChoice => "Choice does not exist",
            ErrorCode::WizardNotOnReview => "Customization is not on the review step",
            ErrorCode::WizardNotOpen => "No customization in progress",
            ErrorCode::CustomizationRequired => "Item requires customization",

            ErrorCode::WrongStep => "Operation not allowed on the current step",
            ErrorCode::StepNotInFlow => "Step is not part of the workflow",

            ErrorCode::PaymentPending => "A payment is already in progress",
            ErrorCode::InvalidPaymentForm => "Payment details are invalid",
            ErrorCode::PaymentDeclined => "Payment was declined",

            ErrorCode::ItemNotFound => "Menu item not found",
            ErrorCode::DataLoadFailed => "Failed to load static data",
            ErrorCode::InvalidConfig => "Invalid configuration value",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),

            1001 => Ok(ErrorCode::LineNotFound),
            1002 => Ok(ErrorCode::CartEmpty),
            1003 => Ok(ErrorCode::InvalidQuantity),

            2001 => Ok(ErrorCode::RequiredOptionMissing),
            2002 => Ok(ErrorCode::UnknownOptionGroup),
            2003 => Ok(ErrorCode::UnknownChoice),
            2004 => Ok(ErrorCode::WizardNotOnReview),
            2005 => Ok(ErrorCode::WizardNotOpen),
            2006 => Ok(ErrorCode::CustomizationRequired),

            3001 => Ok(ErrorCode::WrongStep),
            3002 => Ok(ErrorCode::StepNotInFlow),

            4001 => Ok(ErrorCode::PaymentPending),
            4002 => Ok(ErrorCode::InvalidPaymentForm),
            4003 => Ok(ErrorCode::PaymentDeclined),

            5001 => Ok(ErrorCode::ItemNotFound),
            5002 => Ok(ErrorCode::DataLoadFailed),
            5003 => Ok(ErrorCode::InvalidConfig),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::LineNotFound.code(), 1001);
        assert_eq!(ErrorCode::RequiredOptionMissing.code(), 2001);
        assert_eq!(ErrorCode::WrongStep.code(), 3001);
        assert_eq!(ErrorCode::PaymentPending.code(), 4001);
        assert_eq!(ErrorCode::ItemNotFound.code(), 5001);
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(9999), Err(InvalidErrorCode(9999)));
        assert_eq!(ErrorCode::try_from(2003), Ok(ErrorCode::UnknownChoice));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::CartEmpty).unwrap();
        assert_eq!(json, "1002");
        let back: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(back, ErrorCode::InvalidPaymentForm);
        assert!(serde_json::from_str::<ErrorCode>("77").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::Unknown.to_string(), "E0001");
        assert_eq!(ErrorCode::StepNotInFlow.to_string(), "E3002");
    }
}
