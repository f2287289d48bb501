//! In-memory registry of users and loans.
//!
//! Identifiers are generated from monotonic counters under the directory
//! lock and are never reused, not even after a loan is deleted.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::LoanEngineError;
use crate::schedule;
use crate::types::{Loan, LoanId, LoanTerms, NewUser, User, UserId};
use crate::LoanEngineResult;

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, User>,
    emails: HashMap<String, UserId>,
    loans: HashMap<LoanId, Loan>,
    next_user_id: u64,
    next_loan_id: u64,
}

/// Owns every user and loan record.
///
/// Records are immutable once created; a failed operation commits nothing,
/// not even an identifier.
#[derive(Debug, Default)]
pub struct LoanDirectory {
    state: RwLock<DirectoryState>,
}

impl LoanDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. Emails are unique across the directory.
    pub fn create_user(&self, new_user: NewUser) -> LoanEngineResult<User> {
        let mut state = self.state.write().unwrap();
        if state.emails.contains_key(&new_user.email) {
            return Err(LoanEngineError::DuplicateUser {
                email: new_user.email,
            });
        }

        state.next_user_id += 1;
        let user = User {
            id: UserId(state.next_user_id),
            email: new_user.email,
            is_active: new_user.is_active,
        };
        state.emails.insert(user.email.clone(), user.id);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn get_user(&self, user_id: UserId) -> LoanEngineResult<User> {
        let state = self.state.read().unwrap();
        state
            .users
            .get(&user_id)
            .cloned()
            .ok_or(LoanEngineError::UserNotFound(user_id))
    }

    /// Users ordered by id, paginated.
    pub fn list_users(&self, skip: usize, limit: usize) -> Vec<User> {
        let state = self.state.read().unwrap();
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_unstable_by_key(|user| user.id);
        users.into_iter().skip(skip).take(limit).collect()
    }

    /// Originate a loan for an existing user.
    ///
    /// Terms are checked up front, including that a level payment is
    /// computable, so a stored loan always yields a schedule.
    pub fn create_loan(
        &self,
        owner: UserId,
        terms: LoanTerms,
        originated_on: NaiveDate,
    ) -> LoanEngineResult<Loan> {
        let mut state = self.state.write().unwrap();
        if !state.users.contains_key(&owner) {
            return Err(LoanEngineError::UserNotFound(owner));
        }
        schedule::level_payment(&terms)?;

        state.next_loan_id += 1;
        let loan = Loan {
            id: LoanId(state.next_loan_id),
            owner,
            terms,
            originated_on,
        };
        state.loans.insert(loan.id, loan.clone());
        Ok(loan)
    }

    pub fn get_loan(&self, loan_id: LoanId) -> LoanEngineResult<Loan> {
        let state = self.state.read().unwrap();
        state
            .loans
            .get(&loan_id)
            .cloned()
            .ok_or(LoanEngineError::LoanNotFound(loan_id))
    }

    /// Delete a loan record, returning it. The id is retired for good.
    pub fn remove_loan(&self, loan_id: LoanId) -> LoanEngineResult<Loan> {
        let mut state = self.state.write().unwrap();
        state
            .loans
            .remove(&loan_id)
            .ok_or(LoanEngineError::LoanNotFound(loan_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentFrequency;
    use rust_decimal_macros::dec;

    /// Helper: standard monthly terms.
    fn standard_terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(12000),
            annual_rate: dec!(0.06),
            term_months: 12,
            frequency: PaymentFrequency::Monthly,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            is_active: true,
        }
    }

    fn origination() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    // -----------------------------------------------------------------------
    // 1. User ids are assigned monotonically from 1
    // -----------------------------------------------------------------------
    #[test]
    fn test_create_user_monotonic_ids() {
        let directory = LoanDirectory::new();
        let alice = directory.create_user(new_user("alice@example.com")).unwrap();
        let bob = directory.create_user(new_user("bob@example.com")).unwrap();

        assert_eq!(alice.id, UserId(1));
        assert_eq!(bob.id, UserId(2));
        assert_eq!(directory.get_user(alice.id).unwrap().email, "alice@example.com");
    }

    // -----------------------------------------------------------------------
    // 2. Duplicate emails are rejected and commit nothing
    // -----------------------------------------------------------------------
    #[test]
    fn test_create_user_duplicate_email() {
        let directory = LoanDirectory::new();
        directory.create_user(new_user("alice@example.com")).unwrap();

        let err = directory
            .create_user(new_user("alice@example.com"))
            .unwrap_err();
        assert_eq!(
            err,
            LoanEngineError::DuplicateUser {
                email: "alice@example.com".into()
            }
        );

        // The failed attempt burned no id.
        let bob = directory.create_user(new_user("bob@example.com")).unwrap();
        assert_eq!(bob.id, UserId(2));
    }

    // -----------------------------------------------------------------------
    // 3. Unknown users are reported as such
    // -----------------------------------------------------------------------
    #[test]
    fn test_get_user_unknown() {
        let directory = LoanDirectory::new();
        let err = directory.get_user(UserId(99)).unwrap_err();
        assert_eq!(err, LoanEngineError::UserNotFound(UserId(99)));
    }

    // -----------------------------------------------------------------------
    // 4. User listings are ordered by id and paginate
    // -----------------------------------------------------------------------
    #[test]
    fn test_list_users_pagination() {
        let directory = LoanDirectory::new();
        for name in ["a", "b", "c", "d", "e"] {
            directory
                .create_user(new_user(&format!("{name}@example.com")))
                .unwrap();
        }

        let all = directory.list_users(0, 100);
        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));

        let page = directory.list_users(1, 2);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, UserId(2));
        assert_eq!(page[1].id, UserId(3));
    }

    // -----------------------------------------------------------------------
    // 5. Loans require an existing owner
    // -----------------------------------------------------------------------
    #[test]
    fn test_create_loan_requires_user() {
        let directory = LoanDirectory::new();
        let err = directory
            .create_loan(UserId(99), standard_terms(), origination())
            .unwrap_err();
        assert_eq!(err, LoanEngineError::UserNotFound(UserId(99)));
    }

    // -----------------------------------------------------------------------
    // 6. Invalid terms are rejected before any state changes
    // -----------------------------------------------------------------------
    #[test]
    fn test_create_loan_rejects_bad_terms() {
        let directory = LoanDirectory::new();
        let alice = directory.create_user(new_user("alice@example.com")).unwrap();

        let mut terms = standard_terms();
        terms.principal = dec!(0);
        let err = directory
            .create_loan(alice.id, terms, origination())
            .unwrap_err();
        match err {
            LoanEngineError::InvalidLoanTerms { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidLoanTerms, got {:?}", other),
        }

        // The failed attempt burned no loan id.
        let loan = directory
            .create_loan(alice.id, standard_terms(), origination())
            .unwrap();
        assert_eq!(loan.id, LoanId(1));
    }

    // -----------------------------------------------------------------------
    // 7. Loan records round-trip unchanged
    // -----------------------------------------------------------------------
    #[test]
    fn test_create_and_get_loan() {
        let directory = LoanDirectory::new();
        let alice = directory.create_user(new_user("alice@example.com")).unwrap();
        let created = directory
            .create_loan(alice.id, standard_terms(), origination())
            .unwrap();

        let fetched = directory.get_loan(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.owner, alice.id);
        assert_eq!(fetched.terms, standard_terms());
        assert_eq!(fetched.originated_on, origination());
    }

    // -----------------------------------------------------------------------
    // 8. Deleted loan ids are never reused
    // -----------------------------------------------------------------------
    #[test]
    fn test_remove_loan_retires_id() {
        let directory = LoanDirectory::new();
        let alice = directory.create_user(new_user("alice@example.com")).unwrap();
        let first = directory
            .create_loan(alice.id, standard_terms(), origination())
            .unwrap();

        let removed = directory.remove_loan(first.id).unwrap();
        assert_eq!(removed, first);
        assert_eq!(
            directory.get_loan(first.id).unwrap_err(),
            LoanEngineError::LoanNotFound(first.id)
        );
        assert_eq!(
            directory.remove_loan(first.id).unwrap_err(),
            LoanEngineError::LoanNotFound(first.id)
        );

        let second = directory
            .create_loan(alice.id, standard_terms(), origination())
            .unwrap();
        assert_eq!(second.id, LoanId(2));
    }
}
