//! Flat shipping fees by destination city.

use rust_decimal::Decimal;

/// Reduced flat rate inside the capital, a single higher rate everywhere
/// else, zero while no city is selected.
pub fn fee(city: &str) -> Decimal {
    match city.trim() {
        "" => Decimal::ZERO,
        "Tbilisi" => Decimal::from(5),
        _ => Decimal::from(10),
    }
}
