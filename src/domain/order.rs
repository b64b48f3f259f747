use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// A server-issued payable transaction.
///
/// Created once per checkout attempt and immutable once obtained; an explicit
/// retry discards it and creates a fresh one. `amount` is the tax-inclusive
/// total in major currency units; minor-unit conversion happens only at the
/// gateway boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
}

/// What the gateway sheet hands back on a successful payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentConfirmation {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Everything the payment sheet needs to open: the order coordinates, the
/// merchant presentation strings, and the user contact prefill.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub order_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub key_id: String,
    pub merchant: String,
    pub description: String,
    pub prefill_email: String,
    pub prefill_contact: Option<String>,
}

/// Converts a major-unit amount to gateway minor units (amount * 100),
/// rounding to the nearest unit. Returns `None` when the result does not fit
/// an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
