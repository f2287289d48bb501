//! Loan ownership and read-sharing grants.
//!
//! Every loan has exactly one owner, fixed at registration. The owner may
//! grant read access to other users; grants never transfer ownership and
//! are never revoked implicitly.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::error::LoanEngineError;
use crate::types::{LoanId, UserId};
use crate::LoanEngineResult;

/// Access state for one loan: the owner plus read-only grantees.
#[derive(Debug, Clone)]
struct AccessState {
    owner: UserId,
    grantees: HashSet<UserId>,
}

/// Answers "may user U read loan L?".
///
/// Writes take the registry lock exclusively, so a reader observes a grant
/// either fully applied or not at all.
#[derive(Debug, Default)]
pub struct AccessRegistry {
    loans: RwLock<HashMap<LoanId, AccessState>>,
}

impl AccessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install owner-only access state for a newly created loan.
    pub fn register_loan(&self, loan_id: LoanId, owner: UserId) {
        let mut loans = self.loans.write().unwrap();
        loans.insert(
            loan_id,
            AccessState {
                owner,
                grantees: HashSet::new(),
            },
        );
    }

    /// Grant `grantee` read access to `loan_id`.
    ///
    /// Only the owner may grant. Duplicate grants and grants to the owner
    /// are no-op successes.
    pub fn grant_share(
        &self,
        loan_id: LoanId,
        caller: UserId,
        grantee: UserId,
    ) -> LoanEngineResult<()> {
        let mut loans = self.loans.write().unwrap();
        let state = loans
            .get_mut(&loan_id)
            .ok_or(LoanEngineError::LoanNotFound(loan_id))?;
        if state.owner != caller {
            return Err(LoanEngineError::NotOwner {
                loan: loan_id,
                user: caller,
            });
        }
        if grantee != state.owner {
            state.grantees.insert(grantee);
        }
        Ok(())
    }

    /// Remove a grant. Owner-only and idempotent; ownership is untouched.
    pub fn revoke_share(
        &self,
        loan_id: LoanId,
        caller: UserId,
        grantee: UserId,
    ) -> LoanEngineResult<()> {
        let mut loans = self.loans.write().unwrap();
        let state = loans
            .get_mut(&loan_id)
            .ok_or(LoanEngineError::LoanNotFound(loan_id))?;
        if state.owner != caller {
            return Err(LoanEngineError::NotOwner {
                loan: loan_id,
                user: caller,
            });
        }
        state.grantees.remove(&grantee);
        Ok(())
    }

    /// True iff `user` is the owner or a grantee of `loan_id`.
    ///
    /// Unknown loans and unknown users are simply not readable; this never
    /// errors.
    pub fn can_read(&self, loan_id: LoanId, user: UserId) -> bool {
        let loans = self.loans.read().unwrap();
        match loans.get(&loan_id) {
            Some(state) => state.owner == user || state.grantees.contains(&user),
            None => false,
        }
    }

    /// Every loan `user` owns or has been granted, sorted by id.
    pub fn list_loans_for(&self, user: UserId) -> Vec<LoanId> {
        let loans = self.loans.read().unwrap();
        let mut ids: Vec<LoanId> = loans
            .iter()
            .filter(|(_, state)| state.owner == user || state.grantees.contains(&user))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Drop all access state for a deleted loan.
    pub fn remove_loan(&self, loan_id: LoanId) {
        let mut loans = self.loans.write().unwrap();
        loans.remove(&loan_id);
    }
}
