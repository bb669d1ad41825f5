//! Money display helpers.
//!
//! Amounts live as `Decimal` on the rows that own them; these helpers render
//! them for confirmations and emails.

use rust_decimal::Decimal;

pub fn currency_symbol(code: &str) -> &'static str {
    match code {
        "GEL" => "₾",
        "USD" => "$",
        "EUR" => "€",
        _ => "",
    }
}

/// `₾1,250`: symbol plus a thousands-grouped amount.
pub fn format_price(amount: Decimal, currency: &str) -> String {
    let s = amount.normalize().to_string();
    let (int_part, frac) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac {
        Some(f) => format!("{}{grouped}.{f}", currency_symbol(currency)),
        None => format!("{}{grouped}", currency_symbol(currency)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping() {
        assert_eq!(format_price(Decimal::from(505), "GEL"), "₾505");
        assert_eq!(format_price(Decimal::from(1250), "GEL"), "₾1,250");
        assert_eq!(format_price(Decimal::from(1_250_000), "GEL"), "₾1,250,000");
    }

    #[test]
    fn fractions_survive() {
        assert_eq!(format_price(Decimal::new(50555, 2), "GEL"), "₾505.55");
        // trailing zeros are dropped
        assert_eq!(format_price(Decimal::new(50550, 2), "GEL"), "₾505.5");
        assert_eq!(format_price(Decimal::new(50500, 2), "USD"), "$505");
    }

    #[test]
    fn unknown_currency_has_no_symbol() {
        assert_eq!(format_price(Decimal::from(10), "JPY"), "10");
    }
}
