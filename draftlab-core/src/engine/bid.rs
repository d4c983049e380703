//! Operator bid entry parsing.

use super::error::AuctionError;

/// Parse a typed bid amount.
///
/// Whitespace is trimmed and an empty entry counts as `0`. Fractional
/// amounts are floored and amounts beyond `u64::MAX` saturate to it.
/// Non-numeric, non-finite and negative entries are rejected.
pub fn parse_bid(entry: &str) -> Result<u64, AuctionError> {
    let trimmed = entry.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let invalid = || AuctionError::InvalidBid {
        entry: entry.to_string(),
    };

    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    let floored = value.floor();
    if floored < 0.0 {
        return Err(invalid());
    }
    // Anything past u64::MAX saturates and is left to the budget check.
    Ok(floored as u64)
}

/// Convert a signed amount, rejecting negatives.
pub fn checked_amount(amount: i64) -> Result<u64, AuctionError> {
    u64::try_from(amount).map_err(|_| AuctionError::InvalidBid {
        entry: amount.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integers() {
        assert_eq!(parse_bid("250"), Ok(250));
        assert_eq!(parse_bid("  1200 "), Ok(1200));
        assert_eq!(parse_bid("0"), Ok(0));
    }

    #[test]
    fn empty_entry_is_zero() {
        assert_eq!(parse_bid(""), Ok(0));
        assert_eq!(parse_bid("   "), Ok(0));
    }

    #[test]
    fn fractions_are_floored() {
        assert_eq!(parse_bid("99.9"), Ok(99));
        assert_eq!(parse_bid("0.5"), Ok(0));
        assert_eq!(parse_bid("1e3"), Ok(1000));
    }

    #[test]
    fn huge_amounts_saturate() {
        assert_eq!(parse_bid("18446744073709551615"), Ok(u64::MAX));
        assert_eq!(parse_bid("18446744073709551616"), Ok(u64::MAX));
        assert_eq!(parse_bid("1e30"), Ok(u64::MAX));
    }

    #[test]
    fn rejects_garbage_negative_and_non_finite() {
        for entry in ["abc", "12abc", "-1", "-0.5", "inf", "NaN", "1,000"] {
            assert!(
                matches!(parse_bid(entry), Err(AuctionError::InvalidBid { .. })),
                "{entry} should be rejected"
            );
        }
    }

    #[test]
    fn checked_amount_rejects_negative() {
        assert_eq!(checked_amount(40), Ok(40));
        assert!(matches!(
            checked_amount(-5),
            Err(AuctionError::InvalidBid { .. })
        ));
    }
}
