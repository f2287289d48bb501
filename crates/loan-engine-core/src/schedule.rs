//! Level-payment amortization schedules.
//!
//! Produces the full payment table for a loan: a level payment for every
//! month except the last, which retires the remaining balance exactly and
//! absorbs the rounding residual. All math uses `rust_decimal::Decimal`
//! with half-even rounding at currency precision.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal::RoundingStrategy;

use crate::error::LoanEngineError;
use crate::types::{LoanTerms, Money, Rate, ScheduleEntry};
use crate::LoanEngineResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Currency precision in decimal places.
const CURRENCY_DP: u32 = 2;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The level payment for the given terms.
///
/// `M = round2(P * r * (1+r)^n / ((1+r)^n - 1))` where `r` is the periodic
/// rate and `n` the term in months. At a zero rate this degenerates to
/// `round2(P / n)`.
pub fn level_payment(terms: &LoanTerms) -> LoanEngineResult<Money> {
    validate_terms(terms)?;

    let rate = periodic_rate(terms);
    if rate.is_zero() {
        return Ok(round2(terms.principal / Decimal::from(terms.term_months)));
    }

    let factor = (Decimal::ONE + rate)
        .checked_powi(i64::from(terms.term_months))
        .ok_or_else(|| LoanEngineError::InvalidLoanTerms {
            field: "term_months".into(),
            reason: "Amortization factor overflows decimal precision".into(),
        })?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(LoanEngineError::InvalidLoanTerms {
            field: "annual_rate".into(),
            reason: "Periodic rate is too small to amortize over the term".into(),
        });
    }

    let payment = terms
        .principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| LoanEngineError::InvalidLoanTerms {
            field: "principal".into(),
            reason: "Payment overflows decimal precision".into(),
        })?;

    Ok(round2(payment))
}

/// Compute the full amortization schedule for the given terms.
///
/// The result has exactly `term_months` entries, the final balance is
/// exactly zero, and the principal portions sum to the principal exactly.
/// Same terms always produce the identical sequence.
pub fn compute_schedule(terms: &LoanTerms) -> LoanEngineResult<Vec<ScheduleEntry>> {
    let payment = level_payment(terms)?;
    let rate = periodic_rate(terms);

    let mut entries = Vec::with_capacity(terms.term_months as usize);
    let mut balance = terms.principal;

    for month in 1..terms.term_months {
        let interest = round2(balance * rate);
        let principal = payment - interest;
        balance -= principal;
        entries.push(ScheduleEntry {
            month,
            payment,
            interest,
            principal,
            remaining_balance: balance,
        });
    }

    // Final month retires the whole remaining balance; the payment differs
    // from the level payment by the accumulated rounding residual.
    let interest = round2(balance * rate);
    entries.push(ScheduleEntry {
        month: terms.term_months,
        payment: balance + interest,
        interest,
        principal: balance,
        remaining_balance: Decimal::ZERO,
    });

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the structural constraints on loan terms.
pub fn validate_terms(terms: &LoanTerms) -> LoanEngineResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(LoanEngineError::InvalidLoanTerms {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if terms.annual_rate < Decimal::ZERO {
        return Err(LoanEngineError::InvalidLoanTerms {
            field: "annual_rate".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    if terms.term_months == 0 {
        return Err(LoanEngineError::InvalidLoanTerms {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn periodic_rate(terms: &LoanTerms) -> Rate {
    terms.annual_rate / Decimal::from(terms.frequency.periods_per_year())
}

/// Round to currency precision, half to even.
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointNearestEven)
}
