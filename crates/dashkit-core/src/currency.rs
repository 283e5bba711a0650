//! Currency formatting. All amounts are Algerian dinars.

/// Dinar symbol appended to every amount.
pub const DINAR_SYMBOL: &str = "د.ج";

/// French grouping separator (narrow no-break space).
const GROUP_SEPARATOR: char = '\u{202f}';

/// Full amount, French style: `1 234 567,5 د.ج`. At most 3 fraction digits.
pub fn format_currency(amount: f64) -> String {
    format!("{} {}", format_grouped(amount), DINAR_SYMBOL)
}

/// Compact amount: `1.5M د.ج`, `12.3K د.ج`, or the plain number below 1000.
pub fn format_currency_short(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.1}M {}", amount / 1_000_000.0, DINAR_SYMBOL)
    } else if amount >= 1_000.0 {
        format!("{:.1}K {}", amount / 1_000.0, DINAR_SYMBOL)
    } else {
        format!("{} {}", amount, DINAR_SYMBOL)
    }
}

fn format_grouped(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let thousandths = (amount.abs() * 1000.0).round() as u128;
    let whole = thousandths / 1000;
    let fraction = thousandths % 1000;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }

    if fraction > 0 {
        let fraction = format!("{:03}", fraction);
        grouped.push(',');
        grouped.push_str(fraction.trim_end_matches('0'));
    }

    if amount < 0.0 && thousandths > 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "0 د.ج");
        assert_eq!(format_currency(500.0), "500 د.ج");
        assert_eq!(format_currency(50000.0), "50\u{202f}000 د.ج");
        assert_eq!(format_currency(1234567.5), "1\u{202f}234\u{202f}567,5 د.ج");
        assert_eq!(format_currency(-1200.25), "-1\u{202f}200,25 د.ج");
    }

    #[test]
    fn test_format_currency_rounds_to_three_digits() {
        assert_eq!(format_currency(1.23456), "1,235 د.ج");
        assert_eq!(format_currency(-0.0001), "0 د.ج");
    }

    #[test]
    fn test_format_currency_short() {
        assert_eq!(format_currency_short(2_500_000.0), "2.5M د.ج");
        assert_eq!(format_currency_short(1_000_000.0), "1.0M د.ج");
        assert_eq!(format_currency_short(12_300.0), "12.3K د.ج");
        assert_eq!(format_currency_short(999.0), "999 د.ج");
        assert_eq!(format_currency_short(12.5), "12.5 د.ج");
    }
}
