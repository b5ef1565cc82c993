//! Monetary rounding and decimal persistence helpers
//!
//! Every derived monetary value is rounded to cents with
//! round-half-away-from-zero, one step at a time.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use super::errors::DomainError;

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Canonical text form used for decimal columns.
pub fn to_db(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn from_db(column: &'static str, raw: &str) -> Result<Decimal, DomainError> {
    Decimal::from_str(raw)
        .map_err(|e| DomainError::Storage(format!("Corrupt decimal in {}: {:?} ({})", column, raw, e)))
}

/// Format an amount with its currency, always showing cents.
pub fn format_amount(value: Decimal, currency: &str) -> String {
    format!("{:.2} {}", round2(value), currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round2(dec!(28.505)), dec!(28.51));
        assert_eq!(round2(dec!(28.504)), dec!(28.50));
        assert_eq!(round2(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round2(dec!(0.125)), dec!(0.13));
    }

    #[test]
    fn db_text_roundtrip_is_exact() {
        let v = dec!(178.50);
        assert_eq!(to_db(v), "178.5");
        assert_eq!(from_db("amount", &to_db(v)).unwrap(), v);
        assert!(from_db("amount", "12,5").is_err());
    }

    #[test]
    fn format_amount_pads_cents() {
        assert_eq!(format_amount(dec!(178.5), "DZD"), "178.50 DZD");
        assert_eq!(format_amount(Decimal::ZERO, "DZD"), "0.00 DZD");
    }
}
