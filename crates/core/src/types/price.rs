//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are `Decimal` so cart totals never pick up binary floating-point
//! noise (`0.1 + 0.2`). Formatting follows the conventions of the currency's
//! home locale: INR groups digits in lakhs and crores (`₹1,23,456.00`), every
//! other supported currency groups in thousands.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store's default currency.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Format for display with symbol, grouping and two decimal places.
    ///
    /// ```
    /// use rust_decimal::Decimal;
    /// use shopcart_core::{CurrencyCode, Price};
    ///
    /// let price = Price::new(Decimal::new(12_345_650, 2), CurrencyCode::INR);
    /// assert_eq!(price.display(), "₹1,23,456.50");
    /// ```
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let text = format!("{:.2}", rounded.abs());
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let grouped = if self.currency_code == CurrencyCode::INR {
            group_indian(whole)
        } else {
            group_digits(whole, 3)
        };

        format!("{sign}{}{grouped}.{fraction}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

/// Percentage saved by a discounted price, rounded to the nearest whole
/// percent.
///
/// Returns 0 when there is no discount, when the original price is not
/// positive, when the "discount" is actually a markup, or when the
/// arithmetic overflows.
#[must_use]
pub fn discount_percent(original: Decimal, discounted: Option<Decimal>) -> u32 {
    let Some(discounted) = discounted else {
        return 0;
    };
    if original <= Decimal::ZERO {
        return 0;
    }

    original
        .checked_sub(discounted)
        .and_then(|saving| saving.checked_div(original))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percent| {
            percent
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u32()
        })
        .unwrap_or(0)
}

/// Indian grouping: last three digits, then pairs (`12,34,567`).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    format!("{},{tail}", group_digits(head, 2))
}

/// Insert a comma every `size` digits counting from the right.
fn group_digits(digits: &str, size: usize) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / size);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % size == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
