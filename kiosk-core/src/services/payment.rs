//! Payment Processor
//!
//! The engine only hands a payment over and waits for the outcome; the
//! processor is the seam to real hardware. [`SimulatedPayment`] validates the
//! card form and approves after a fixed delay.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use shared::error::{KioskError, KioskResult};
use shared::order::{PaymentField, PaymentForm, PaymentMethod, PaymentOutcome};
use std::time::Duration;

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Run one payment to completion
    async fn submit(&self, method: PaymentMethod, form: PaymentForm) -> PaymentOutcome;
}

/// Approves every valid payment after `delay`
#[derive(Debug, Clone)]
pub struct SimulatedPayment {
    delay: Duration,
}

impl SimulatedPayment {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedPayment {
    fn default() -> Self {
        Self::new(Duration::from_millis(2_000))
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedPayment {
    async fn submit(&self, method: PaymentMethod, form: PaymentForm) -> PaymentOutcome {
        if method == PaymentMethod::Card
            && let Err(e) = validate_card(&form, Utc::now().date_naive())
        {
            return PaymentOutcome::Declined(e);
        }
        tokio::time::sleep(self.delay).await;
        tracing::info!(target: "audit", ?method, "Simulated payment approved");
        PaymentOutcome::Approved
    }
}

/// Check every card field, first failure wins
///
/// Spaces in the card number are ignored. The expiry month counts as valid
/// until it is over.
pub fn validate_card(form: &PaymentForm, today: NaiveDate) -> KioskResult<()> {
    let invalid = |field| Err(KioskError::InvalidPaymentForm(field));

    let digits: String = form.card_number.chars().filter(|c| !c.is_whitespace()).collect();
    if !(13..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return invalid(PaymentField::CardNumber);
    }
    if form.cardholder_name.trim().is_empty() {
        return invalid(PaymentField::CardholderName);
    }
    if !expiry_valid(&form.expiry_date, today) {
        return invalid(PaymentField::ExpiryDate);
    }
    let cvv = form.cvv.trim();
    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return invalid(PaymentField::Cvv);
    }
    Ok(())
}

fn expiry_valid(expiry: &str, today: NaiveDate) -> bool {
    let Some((mm, yy)) = expiry.trim().split_once('/') else {
        return false;
    };
    if mm.len() != 2 || yy.len() != 2 {
        return false;
    }
    let (Ok(month), Ok(year)) = (mm.parse::<u32>(), yy.parse::<i32>()) else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }
    (2000 + year, month) >= (today.year(), today.month())
}

/// Group card digits in blocks of four for display ("4242 4242 ...")
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize free typing into `MM/YY`
pub fn format_expiry_input(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(4).collect();
    if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}
