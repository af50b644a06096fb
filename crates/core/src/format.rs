use rust_decimal::{Decimal, RoundingStrategy};

const MANWON: i64 = 10_000;

/// `100000` -> `100,000원`
pub fn format_won(amount: u64) -> String {
    format!("{}원", group_thousands(amount))
}

/// Amount in 10,000-won units with one decimal, `135000` -> `13.5`.
pub fn format_manwon(amount: u64) -> String {
    let mut value = (Decimal::from(amount) / Decimal::from(MANWON))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(1);
    value.to_string()
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::{format_manwon, format_won};

    #[test]
    fn won_amounts_use_thousand_separators() {
        assert_eq!(format_won(0), "0원");
        assert_eq!(format_won(30_000), "30,000원");
        assert_eq!(format_won(1_500_000), "1,500,000원");
    }

    #[test]
    fn manwon_keeps_one_decimal() {
        assert_eq!(format_manwon(60_000), "6.0");
        assert_eq!(format_manwon(135_000), "13.5");
        assert_eq!(format_manwon(67_500), "6.8");
        assert_eq!(format_manwon(42_340), "4.2");
    }
}
