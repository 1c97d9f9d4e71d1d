//! Currency rendering for budget figures.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::DISPLAY_DECIMAL_PRECISION;

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" | "NZD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats an amount as `$12,345.67`, `-$50.00` or `CHF 1,000.00`.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(DISPLAY_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded);
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if amount < Decimal::ZERO && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let prefix = match currency_symbol(currency) {
        Some(symbol) => symbol.to_string(),
        None => format!("{} ", currency.to_ascii_uppercase()),
    };

    format!("{}{}{}.{}", sign, prefix, group_thousands(whole), fraction)
}

/// Formats a percentage as `33.33%`, rounded like [`format_currency`].
pub fn format_percentage(value: Decimal) -> String {
    let rounded =
        value.round_dp_with_strategy(DISPLAY_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{:.2}%", rounded)
}
