//! Display formatting shared by the CLI and the exports.

/// Whole-number money with en-US thousands grouping: `12500` → `"12,500"`.
pub fn money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Ratings print without a trailing `.0` when whole.
pub fn rating(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(0), "0");
        assert_eq!(money(999), "999");
        assert_eq!(money(1000), "1,000");
        assert_eq!(money(12_500), "12,500");
        assert_eq!(money(1_234_567), "1,234,567");
    }

    #[test]
    fn rating_trims_whole_numbers() {
        assert_eq!(rating(88.0), "88");
        assert_eq!(rating(79.5), "79.5");
    }
}
