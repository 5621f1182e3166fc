//! Amount parsing and French-style amount formatting.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FormatError;
use crate::sheet::Cell;

/// What `format_amount` renders when the value is not a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountFallback {
    /// Render `0,00`.
    #[default]
    Zero,
    /// Render the raw value as-is.
    Original,
}

/// Parse a cell into a decimal amount.
pub fn parse_amount(cell: &Cell) -> Result<Decimal, FormatError> {
    match cell {
        Cell::Number(n) => {
            Decimal::from_f64(*n).ok_or_else(|| FormatError::NotANumber(cell.display()))
        }
        Cell::Text(s) => parse_amount_str(s),
        _ => Err(FormatError::NotANumber(cell.display())),
    }
}

/// Parse an amount written with optional space grouping and a comma or
/// period as decimal separator (e.g. "1 234,5" or "1234.50").
pub fn parse_amount_str(s: &str) -> Result<Decimal, FormatError> {
    let normalized: String = s
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{00a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| FormatError::NotANumber(s.to_string()))
}

/// Format a decimal with two decimals, space-grouped thousands, and a comma
/// decimal separator (1234.5 → "1 234,50").
pub fn format_decimal(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }

    let s = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::with_capacity(s.len() + chars.len() / 3 + 1);
    if rounded.is_sign_negative() {
        formatted.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}

/// Format a raw cell as an amount, applying `fallback` when it is not a
/// number.
pub fn format_amount(cell: &Cell, fallback: AmountFallback) -> String {
    match parse_amount(cell) {
        Ok(amount) => format_decimal(amount),
        Err(_) => match fallback {
            AmountFallback::Zero => "0,00".to_string(),
            AmountFallback::Original => cell.display(),
        },
    }
}
