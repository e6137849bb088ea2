//! Loan arithmetic shown in the credit summary.

use crate::format::{format_currency, NOT_AVAILABLE};

/// Annual rate used for the installment estimate. Not read from the record.
pub const ANNUAL_INTEREST_RATE: f64 = 0.12;

/// Label printed for the interest rate row.
pub const INTEREST_RATE_LABEL: &str = "12% anual";

/// Monthly rate derived from [`ANNUAL_INTEREST_RATE`].
pub fn monthly_rate() -> f64 {
    ANNUAL_INTEREST_RATE / 12.0
}

/// Fixed amortized installment for `principal` over `months`.
///
/// Returns `None` when either input is non-positive or not finite, and when
/// the term is so long that compounding overflows.
pub fn monthly_installment(principal: f64, months: f64) -> Option<f64> {
    if !principal.is_finite() || principal <= 0.0 || !months.is_finite() || months <= 0.0 {
        return None;
    }

    let rate = monthly_rate();
    let growth = (1.0 + rate).powf(months);
    if !growth.is_finite() {
        return None;
    }
    Some(principal * (rate * growth) / (growth - 1.0))
}

/// Formats the installment for the record's amount and term, or `N/A`.
pub fn installment_label(principal: Option<f64>, months: Option<f64>) -> String {
    monthly_installment(principal.unwrap_or(0.0), months.unwrap_or(0.0))
        .map(format_currency)
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}
