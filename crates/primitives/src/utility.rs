use crate::error::ApiError;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use validator::ValidationError;

const MINOR_UNIT_SCALE: u32 = 2;
const REFERENCE_SUFFIX_LEN: usize = 9;
const ACCOUNT_NUMBER_LEN: usize = 10;
const PIN_LEN: usize = 4;

/// Largest amount a single operation may move: 1,000,000,000.00.
pub const MAX_AMOUNT_MINOR: i64 = 100_000_000_000;

/// Renders minor units (cents) as a two-place decimal string, e.g. `5000` -> `"50.00"`.
pub fn format_minor(amount: i64) -> String {
    to_decimal(amount).to_string()
}

pub fn to_decimal(amount: i64) -> Decimal {
    Decimal::new(amount, MINOR_UNIT_SCALE)
}

/// Parses a client supplied amount (JSON string or number) into minor units.
///
/// Accepts at most two fractional digits; anything that is not a strictly
/// positive decimal is rejected.
pub fn parse_amount(raw: &Value) -> Result<i64, ApiError> {
    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => return Err(ApiError::InvalidAmount("amount is required".into())),
        _ => return Err(ApiError::InvalidAmount("amount must be a number".into())),
    };

    let parsed = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ApiError::InvalidAmount(format!("'{}' is not a number", text)))?
        .normalize();

    if parsed <= Decimal::ZERO {
        return Err(ApiError::InvalidAmount("amount must be greater than zero".into()));
    }

    if parsed.scale() > MINOR_UNIT_SCALE {
        return Err(ApiError::InvalidAmount(
            "amount cannot have more than two decimal places".into(),
        ));
    }

    (parsed * Decimal::from(100))
        .to_i64()
        .filter(|minor| *minor <= MAX_AMOUNT_MINOR)
        .ok_or_else(|| {
            ApiError::InvalidAmount(format!(
                "amount cannot exceed {}",
                format_minor(MAX_AMOUNT_MINOR)
            ))
        })
}

/// Human readable correlation code: `TXN<unix millis><9 uppercase alphanumerics>`.
pub fn generate_reference() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFERENCE_SUFFIX_LEN)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();

    format!("TXN{}{}", Utc::now().timestamp_millis(), suffix)
}

pub fn refund_reference(original: &str) -> String {
    format!("REF-{}", original)
}

pub fn loan_reference(loan_id: &uuid::Uuid) -> String {
    let simple = loan_id.simple().to_string();
    format!("LOAN-{}", simple[..8].to_uppercase())
}

pub fn generate_account_number() -> String {
    let mut rng = rand::thread_rng();
    // leading digit never zero so the number keeps its width when parsed
    let first = rng.gen_range(1..=9);
    let rest: String = (1..ACCOUNT_NUMBER_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..=9u8)))
        .collect();
    format!("{}{}", first, rest)
}

pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == PIN_LEN && pin.chars().all(|c| c.is_ascii_digit())
}

pub fn validate_pin(pin: &str) -> Result<(), ValidationError> {
    if is_valid_pin(pin) {
        return Ok(());
    }

    let mut err = ValidationError::new("pin_format");
    err.add_param("length".into(), &PIN_LEN);
    Err(err)
}
