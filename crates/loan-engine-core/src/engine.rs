//! Typed facade over the directory, access registry, and schedule cache.
//!
//! This is the seam a transport layer would call. Every read of loan data
//! goes through the access gate, and the write operations keep the three
//! state objects consistent with one another.

use chrono::NaiveDate;

use crate::access::AccessRegistry;
use crate::cache::{Schedule, ScheduleCache};
use crate::directory::LoanDirectory;
use crate::error::LoanEngineError;
use crate::schedule::compute_schedule;
use crate::summary::derive_summary;
use crate::types::{Loan, LoanId, LoanTerms, MonthSummary, NewUser, User, UserId};
use crate::LoanEngineResult;

/// One engine instance owns all mutable state.
///
/// Construct one per logical deployment and share it by reference; nothing
/// here is process-wide. The engine is `Send + Sync` and safe under
/// concurrent callers.
#[derive(Debug, Default)]
pub struct LoanEngine {
    directory: LoanDirectory,
    access: AccessRegistry,
    cache: ScheduleCache,
}

impl LoanEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub fn create_user(&self, new_user: NewUser) -> LoanEngineResult<User> {
        self.directory.create_user(new_user)
    }

    pub fn get_user(&self, user_id: UserId) -> LoanEngineResult<User> {
        self.directory.get_user(user_id)
    }

    pub fn list_users(&self, skip: usize, limit: usize) -> Vec<User> {
        self.directory.list_users(skip, limit)
    }

    // -----------------------------------------------------------------------
    // Loans
    // -----------------------------------------------------------------------

    /// Originate a loan owned by `owner` and install its access state.
    pub fn create_loan(
        &self,
        owner: UserId,
        terms: LoanTerms,
        originated_on: NaiveDate,
    ) -> LoanEngineResult<Loan> {
        let loan = self.directory.create_loan(owner, terms, originated_on)?;
        self.access.register_loan(loan.id, owner);
        Ok(loan)
    }

    /// Ids of every loan `user` owns or has been granted, sorted.
    pub fn list_loans_for(&self, user: UserId) -> LoanEngineResult<Vec<LoanId>> {
        self.directory.get_user(user)?;
        Ok(self.access.list_loans_for(user))
    }

    /// The loan record, if `requester` may read it.
    pub fn loan_for(&self, loan_id: LoanId, requester: UserId) -> LoanEngineResult<Loan> {
        let loan = self.directory.get_loan(loan_id)?;
        self.check_read(loan_id, requester)?;
        Ok(loan)
    }

    /// The full amortization schedule, if `requester` may read it.
    ///
    /// Computed at most once per loan; repeated calls return the same shared
    /// rows.
    pub fn schedule_for(&self, loan_id: LoanId, requester: UserId) -> LoanEngineResult<Schedule> {
        let loan = self.directory.get_loan(loan_id)?;
        self.check_read(loan_id, requester)?;
        self.cache
            .get_or_compute(loan_id, || compute_schedule(&loan.terms))
    }

    /// Cumulative position after `month`, if `requester` may read it.
    pub fn summary_for(
        &self,
        loan_id: LoanId,
        requester: UserId,
        month: u32,
    ) -> LoanEngineResult<MonthSummary> {
        let schedule = self.schedule_for(loan_id, requester)?;
        derive_summary(&schedule, month)
    }

    // -----------------------------------------------------------------------
    // Sharing
    // -----------------------------------------------------------------------

    /// Grant `grantee` read access to `loan_id`.
    ///
    /// The loan and the grantee must exist and `caller` must be the owner.
    /// Re-granting is a no-op success.
    pub fn share_loan(
        &self,
        loan_id: LoanId,
        caller: UserId,
        grantee: UserId,
    ) -> LoanEngineResult<()> {
        self.directory.get_loan(loan_id)?;
        self.directory.get_user(grantee)?;
        self.access.grant_share(loan_id, caller, grantee)
    }

    /// Remove a grant. Owner-only, idempotent, never affects ownership.
    pub fn revoke_share(
        &self,
        loan_id: LoanId,
        caller: UserId,
        grantee: UserId,
    ) -> LoanEngineResult<()> {
        self.directory.get_loan(loan_id)?;
        self.access.revoke_share(loan_id, caller, grantee)
    }

    /// Whether `user` may currently read `loan_id`. Never errors.
    pub fn can_read(&self, loan_id: LoanId, user: UserId) -> bool {
        self.access.can_read(loan_id, user)
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    /// Delete a loan and every trace of it: the record, its grants, and its
    /// cached schedule. Owner-only; the id is retired for good.
    pub fn delete_loan(&self, loan_id: LoanId, caller: UserId) -> LoanEngineResult<Loan> {
        let loan = self.directory.get_loan(loan_id)?;
        if loan.owner != caller {
            return Err(LoanEngineError::NotOwner {
                loan: loan_id,
                user: caller,
            });
        }

        let removed = self.directory.remove_loan(loan_id)?;
        self.access.remove_loan(loan_id);
        self.cache.invalidate(loan_id);
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn check_read(&self, loan_id: LoanId, requester: UserId) -> LoanEngineResult<()> {
        if self.access.can_read(loan_id, requester) {
            Ok(())
        } else {
            Err(LoanEngineError::AccessDenied {
                loan: loan_id,
                user: requester,
            })
        }
    }
}
