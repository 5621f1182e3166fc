//! Field formatting rules: dates, amounts, and amounts in words.

pub mod amounts;
pub mod dates;
pub mod words;

pub use amounts::{format_amount, format_decimal, parse_amount, parse_amount_str, AmountFallback};
pub use dates::{format_date, parse_date};
pub use words::{amount_to_words, number_to_words};

use crate::error::FormatError;
use crate::sheet::Cell;

/// Converts raw cells into display strings under a fixed fallback policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFormatter {
    amount_fallback: AmountFallback,
}

impl FieldFormatter {
    pub fn new(amount_fallback: AmountFallback) -> Self {
        Self { amount_fallback }
    }

    pub fn amount_fallback(&self) -> AmountFallback {
        self.amount_fallback
    }

    /// `DD-MM-YYYY`, or the raw value when it is not a date.
    pub fn format_date(&self, cell: &Cell) -> String {
        format_date(cell)
    }

    /// `1 234,50`, or the policy's fallback when it is not a number.
    pub fn format_amount(&self, cell: &Cell) -> String {
        format_amount(cell, self.amount_fallback)
    }

    /// Amount spelled out in French; the cell must hold a number.
    pub fn amount_to_words(&self, cell: &Cell) -> Result<String, FormatError> {
        parse_amount(cell).map(amount_to_words)
    }
}
