//! Payment types exchanged with the payment collaborator

use crate::error::KioskError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 支付方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Mobile,
    Cash,
}

/// Raw form data entered on the payment screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaymentForm {
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub cardholder_name: String,
    /// MM/YY
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
}

/// Form field that failed validation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentField {
    CardNumber,
    CardholderName,
    ExpiryDate,
    Cvv,
}

impl PaymentField {
    pub fn message_key(&self) -> &'static str {
        match self {
            PaymentField::CardNumber => "invalid_card_number",
            PaymentField::CardholderName => "card_name_required",
            PaymentField::ExpiryDate => "invalid_expiry_date",
            PaymentField::Cvv => "invalid_cvv",
        }
    }
}

impl fmt::Display for PaymentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentField::CardNumber => "card_number",
            PaymentField::CardholderName => "cardholder_name",
            PaymentField::ExpiryDate => "expiry_date",
            PaymentField::Cvv => "cvv",
        };
        f.write_str(name)
    }
}

/// Result reported by the payment collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Approved,
    Declined(KioskError),
}

impl PaymentOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentOutcome::Approved)
    }
}
