use thiserror::Error;

use crate::types::{LoanId, UserId};

/// Error taxonomy for the engine. `Clone` so the schedule cache can hand a
/// single computation's outcome to every concurrent waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanEngineError {
    #[error("Invalid loan terms: {field} — {reason}")]
    InvalidLoanTerms { field: String, reason: String },

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),

    #[error("Month {month} is out of range for a {term_months}-month schedule")]
    MonthOutOfRange { month: u32, term_months: u32 },

    #[error("User {user} is not the owner of loan {loan}")]
    NotOwner { loan: LoanId, user: UserId },

    #[error("User already registered: {email}")]
    DuplicateUser { email: String },

    #[error("User {user} has no access to loan {loan}")]
    AccessDenied { loan: LoanId, user: UserId },
}
