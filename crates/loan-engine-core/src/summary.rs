//! Month-indexed summaries derived from a computed schedule.

use rust_decimal::Decimal;

use crate::error::LoanEngineError;
use crate::types::{MonthSummary, ScheduleEntry};
use crate::LoanEngineResult;

/// Cumulative interest and principal through `month`, the balance after that
/// month's payment, and the month's own schedule row.
///
/// `month` is 1-based and must lie within the schedule; the summary is
/// derived on every call and never stored.
pub fn derive_summary(
    schedule: &[ScheduleEntry],
    month: u32,
) -> LoanEngineResult<MonthSummary> {
    let term_months = schedule.len() as u32;
    if month == 0 || month > term_months {
        return Err(LoanEngineError::MonthOutOfRange { month, term_months });
    }

    let mut cumulative_interest = Decimal::ZERO;
    let mut cumulative_principal = Decimal::ZERO;
    for entry in &schedule[..month as usize] {
        cumulative_interest += entry.interest;
        cumulative_principal += entry.principal;
    }

    let entry = schedule[month as usize - 1].clone();
    Ok(MonthSummary {
        month,
        cumulative_interest,
        cumulative_principal,
        remaining_balance: entry.remaining_balance,
        entry,
    })
}
