//! Display helpers for the stat cards.

/// `1234` → `"1.2K"`, `2500000` → `"2.5M"`, smaller numbers unchanged.
pub fn format_number(n: i64) -> String {
    let abs = n.unsigned_abs();
    if abs >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if abs >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// US dollars with thousands separators: `"$1,234.50"`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(999, "999")]
    #[case(1000, "1.0K")]
    #[case(42750, "42.8K")]
    #[case(2_500_000, "2.5M")]
    #[case(-1500, "-1.5K")]
    fn numbers_are_abbreviated(#[case] n: i64, #[case] expected: &str) {
        assert_eq!(format_number(n), expected);
    }

    #[rstest]
    #[case(0.0, "$0.00")]
    #[case(1234.5, "$1,234.50")]
    #[case(500000.0, "$500,000.00")]
    #[case(1234567.891, "$1,234,567.89")]
    #[case(-12.3, "-$12.30")]
    fn currency_is_grouped(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }
}
