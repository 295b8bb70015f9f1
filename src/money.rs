//! Presentation of monetary amounts. Sums are carried at full precision
//! and only rounded to cents here, when they leave the service as JSON
//! numbers or CSV cells.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serializer;

/// Largest amount a `NUMERIC(12,2)` column holds: 9 999 999 999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Round to currency precision, half away from zero.
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Serialize a rounded amount as a JSON number.
pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // Parsing the decimal text gives the nearest f64
    let value: f64 = round(*amount)
        .to_string()
        .parse()
        .map_err(|_| serde::ser::Error::custom(format!("amount {amount} out of range")))?;
    serializer.serialize_f64(value)
}

/// Fixed two-place text, used for CSV cells.
pub fn format(amount: Decimal) -> String {
    format!("{:.2}", round(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round(dec!(0.125)), dec!(0.13));
        assert_eq!(round(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round(dec!(10)), dec!(10));
    }

    #[test]
    fn test_serialize_as_number() {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(serialize_with = "serialize")]
            amount: Decimal,
        }

        let json = serde_json::to_value(Wrapper {
            amount: dec!(1850.004),
        })
        .unwrap();
        assert_eq!(json["amount"], serde_json::json!(1850.0));
    }

    #[test]
    fn test_max_amount_matches_column_range() {
        assert_eq!(MAX_AMOUNT, dec!(9999999999.99));
        assert_eq!(MAX_AMOUNT.scale(), 2);
    }

    #[test]
    fn test_format_pads_cents() {
        assert_eq!(format(dec!(150)), "150.00");
        assert_eq!(format(dec!(19.9)), "19.90");
    }
}
